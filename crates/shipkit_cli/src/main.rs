use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use rand::SeedableRng;
use rand::rngs::StdRng;
use shipkit_io_xlsx::{SpecReportWriteOptions, read_shipment_table, write_shipment_report};
use shipkit_report::synthesize_report;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::opts::Opts;

mod opts;

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    configure_tracing(&opts.verbose)?;

    let table = read_shipment_table(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    debug!("loaded {} records from {}", table.height(), opts.input.display());

    let options = opts.build_synthesis_options();
    let report = match opts.seed {
        Some(n_seed) => synthesize_report(&table, &options, &mut StdRng::seed_from_u64(n_seed))?,
        None => synthesize_report(&table, &options, &mut rand::rng())?,
    };

    let write_options = SpecReportWriteOptions::default();
    let path_file_out = opts.build_output_path(&write_options)?;
    let xlsx_report = write_shipment_report(&report, path_file_out.clone(), write_options)
        .with_context(|| format!("writing {}", path_file_out.display()))?;
    info!("{} sheets, {} warnings", xlsx_report.sheets.len(), xlsx_report.warnings.len());

    println!("{}", report.report);
    println!("{}", path_file_out.display());

    Ok(())
}

/// Install a stderr fmt subscriber; `RUST_LOG` overrides the `-v`/`-q` level.
fn configure_tracing(verbose: &Verbosity<InfoLevel>) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(verbose.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;

    Ok(())
}
