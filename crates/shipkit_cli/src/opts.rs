use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use shipkit_io_xlsx::{SpecReportWriteOptions, XlsxIoError, derive_output_file_name_now};
use shipkit_report::{EnumColumnIdentifier, SpecSynthesisOptions, derive_default_synthesis_options};

#[derive(Parser, Debug)]
#[command(name = "shipkit")]
#[command(bin_name = "shipkit")]
#[command(version, about = "Build the bulk shipment workbook from a shipment export", long_about = None)]
pub struct Opts {
    /// Shipment table (.xlsx, .xlsm, .xlsb, .xls, .ods, .arrow, .ipc, .feather)
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output workbook path
    #[arg(long, value_name = "FILE", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Directory receiving a timestamped output workbook
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Seed for the handler distribution; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Handler roster, in remainder preference order
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub handlers: Option<Vec<String>>,

    /// Handlers that never receive a remainder PO
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub low_priority: Option<Vec<String>>,

    /// Handler guaranteed at least one PO
    #[arg(long)]
    pub required: Option<String>,

    /// Handlers removed from the roster for this run
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Identifier prefix length used to group records
    #[arg(long)]
    pub group_key_len: Option<usize>,

    /// Column holding the shipment identifier (name or zero-based index)
    #[arg(long, value_name = "COLUMN")]
    pub col_identifier: Option<String>,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Opts {
    pub fn build_synthesis_options(&self) -> SpecSynthesisOptions {
        let mut options = derive_default_synthesis_options();

        if let Some(l_handlers) = &self.handlers {
            options.roster.handlers = l_handlers.clone();
            options
                .roster
                .handlers_low_priority
                .retain(|c_handler| l_handlers.contains(c_handler));
            options.roster.handler_required = options
                .roster
                .handler_required
                .take()
                .filter(|c_handler| l_handlers.contains(c_handler));
        }
        if let Some(l_low_priority) = &self.low_priority {
            options.roster.handlers_low_priority = l_low_priority.clone();
        }
        if let Some(c_required) = &self.required {
            options.roster.handler_required = Some(c_required.clone());
        }
        for c_handler in &self.exclude {
            options.roster = options.roster.without(c_handler);
        }

        if let Some(n_len) = self.group_key_len {
            options.n_len_group_key = n_len;
        }
        if let Some(c_col) = &self.col_identifier {
            options.schema.col_identifier = parse_column_identifier(c_col);
        }

        options
    }

    pub fn build_output_path(
        &self,
        write_options: &SpecReportWriteOptions,
    ) -> Result<PathBuf, XlsxIoError> {
        match &self.output {
            Some(path) => Ok(path.clone()),
            None => Ok(self
                .output_dir
                .join(derive_output_file_name_now(write_options)?)),
        }
    }
}

fn parse_column_identifier(value: &str) -> EnumColumnIdentifier {
    match value.parse::<usize>() {
        Ok(n_idx) => EnumColumnIdentifier::Index(n_idx),
        Err(_) => EnumColumnIdentifier::Name(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_the_standard_roster() {
        let opts = Opts::try_parse_from(["shipkit", "--input", "in.xlsx"]).unwrap();
        let options = opts.build_synthesis_options();
        assert_eq!(options, derive_default_synthesis_options());
        assert_eq!(opts.output_dir, PathBuf::from("."));
    }

    #[test]
    fn roster_flags_are_applied_in_order() {
        let opts = Opts::try_parse_from([
            "shipkit",
            "--input",
            "in.xlsx",
            "--handlers",
            "A,B,C",
            "--low-priority",
            "C",
            "--required",
            "B",
            "--exclude",
            "A",
            "--group-key-len",
            "10",
            "--col-identifier",
            "Shipment",
        ])
        .unwrap();
        let options = opts.build_synthesis_options();
        assert_eq!(options.roster.handlers, vec!["B", "C"]);
        assert_eq!(options.roster.handlers_low_priority, vec!["C"]);
        assert_eq!(options.roster.handler_required.as_deref(), Some("B"));
        assert_eq!(options.n_len_group_key, 10);
        assert_eq!(
            options.schema.col_identifier,
            EnumColumnIdentifier::Name("Shipment".to_string())
        );
    }

    #[test]
    fn replaced_roster_drops_stale_roles() {
        let opts =
            Opts::try_parse_from(["shipkit", "--input", "in.xlsx", "--handlers", "X,Y"]).unwrap();
        let options = opts.build_synthesis_options();
        assert!(options.roster.handlers_low_priority.is_empty());
        assert_eq!(options.roster.handler_required, None);
        assert!(options.roster.validate().is_ok());
    }

    #[test]
    fn output_path_is_explicit_or_timestamped() {
        let write_options = SpecReportWriteOptions::default();

        let opts =
            Opts::try_parse_from(["shipkit", "--input", "in.xlsx", "--output", "out.xlsx"]).unwrap();
        assert_eq!(
            opts.build_output_path(&write_options).unwrap(),
            PathBuf::from("out.xlsx")
        );

        let opts =
            Opts::try_parse_from(["shipkit", "--input", "in.xlsx", "--output-dir", "reports"])
                .unwrap();
        let path = opts.build_output_path(&write_options).unwrap();
        assert!(path.starts_with("reports"));
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("SMW Bulk Shipments ")
        );
    }
}
