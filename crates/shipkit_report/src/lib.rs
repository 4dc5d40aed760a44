//! `shipkit_report` v1:
//! Shipment report synthesis engine.
//!
//! Pure computation over an in-memory shipment table; loading and rendering
//! live in `shipkit_io_xlsx`.
//! - `conf`       : constants and default presets
//! - `spec`       : models/options/errors
//! - `util`       : keys, canonicalization, box numbering, gap and status rules
//! - `distribute` : balanced workload distribution with anti-consecutive shuffle
//! - `pivot`      : item-code by box aggregation
//! - `report`     : run-time report model
//! - `synth`      : end-to-end pipeline
pub mod conf;
pub mod distribute;
pub mod pivot;
pub mod report;
pub mod spec;
pub mod synth;
pub mod util;

pub use conf::{
    C_STATUS_AWAITING_UPLOAD, C_STATUS_UPLOADED, C_STATUS_WITH_ISSUE, EnumColumnIdentifier,
    N_LEN_GROUP_KEY, derive_default_roster, derive_default_schema,
    derive_default_synthesis_options,
};
pub use distribute::{distribute_workload, plan_handler_counts, shuffle_no_consecutive};
pub use report::{ReportSynthesis, ReportSynthesisBuilder};
pub use spec::{
    EnumPoStatus, ShipmentReportError, SpecAssignment, SpecBoxedRecord, SpecCoercionWarning,
    SpecGroupReport, SpecPivotTable, SpecPoSummaryRow, SpecRecord, SpecRecordGroup,
    SpecRecordKeys, SpecResolvedSchema, SpecRoster, SpecSchema, SpecShipmentReport,
    SpecShipmentTable, SpecSynthesisOptions,
};
pub use synth::{build_group_report, group_records, synthesize_report};
pub use util::{
    assign_box_numbers, canonicalize_po_number, coerce_integer, dedup_canonical_pos,
    derive_prefix, derive_record_keys, derive_status, detect_missing_shipment,
};
