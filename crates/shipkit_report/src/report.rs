//! Synthesis run report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::SpecCoercionWarning;

/// Aggregate counters and diagnostics for one synthesis run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportSynthesis {
    /// Number of input records.
    pub cnt_records: u64,
    /// Number of record groups.
    pub cnt_groups: u64,
    /// Number of distinct canonical POs.
    pub cnt_pos_unique: u64,
    /// Number of groups whose canonical PO repeats an earlier one.
    pub cnt_pos_duplicate: u64,
    /// Values that failed numeric coercion.
    pub warnings: Vec<SpecCoercionWarning>,
}

impl ReportSynthesis {
    /// Number of coercion warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_records".to_string(), self.cnt_records);
        dict_counts.insert("cnt_groups".to_string(), self.cnt_groups);
        dict_counts.insert("cnt_pos_unique".to_string(), self.cnt_pos_unique);
        dict_counts.insert("cnt_pos_duplicate".to_string(), self.cnt_pos_duplicate);
        dict_counts.insert("cnt_coercion_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} records={} groups={} pos={} duplicates={} warnings={}",
            dict_counts["cnt_records"],
            dict_counts["cnt_groups"],
            dict_counts["cnt_pos_unique"],
            dict_counts["cnt_pos_duplicate"],
            dict_counts["cnt_coercion_warnings"]
        )
    }
}

impl fmt::Display for ReportSynthesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[SHIPMENTS]"))
    }
}

/// Mutable accumulator for synthesis statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportSynthesisBuilder {
    /// See [`ReportSynthesis::cnt_records`].
    pub cnt_records: u64,
    /// See [`ReportSynthesis::cnt_groups`].
    pub cnt_groups: u64,
    /// See [`ReportSynthesis::cnt_pos_unique`].
    pub cnt_pos_unique: u64,
    /// See [`ReportSynthesis::cnt_pos_duplicate`].
    pub cnt_pos_duplicate: u64,
    /// See [`ReportSynthesis::warnings`].
    pub warnings: Vec<SpecCoercionWarning>,
}

impl ReportSynthesisBuilder {
    /// Add one coercion warning.
    pub fn add_warning(&mut self, warning: SpecCoercionWarning) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportSynthesis {
        ReportSynthesis {
            cnt_records: self.cnt_records,
            cnt_groups: self.cnt_groups,
            cnt_pos_unique: self.cnt_pos_unique,
            cnt_pos_duplicate: self.cnt_pos_duplicate,
            warnings: self.warnings,
        }
    }
}
