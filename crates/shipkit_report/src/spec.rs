//! Shipment report models, options and top-level error types.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::conf::{
    C_STATUS_AWAITING_UPLOAD, C_STATUS_UPLOADED, C_STATUS_WITH_ISSUE, EnumColumnIdentifier,
    N_LEN_GROUP_KEY, N_NCOLS_INPUT_MIN, derive_default_roster, derive_default_schema,
};
use crate::report::ReportSynthesis;
use crate::util::derive_status;

////////////////////////////////////////////////////////////////////////////////
// #region InputTable

/// One input row. Values are opaque text so leading zeros survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRecord {
    /// Zero-based position of the row in the input table.
    pub idx_row: usize,
    /// Cell values in column order.
    pub values: Vec<String>,
}

impl SpecRecord {
    /// Value at `idx_col`, or `""` when the row is shorter than the header.
    pub fn value(&self, idx_col: usize) -> &str {
        self.values.get(idx_col).map(String::as_str).unwrap_or("")
    }
}

/// Flat input table: header names plus immutable records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecShipmentTable {
    /// Column names.
    pub columns: Vec<String>,
    /// Records in original row order.
    pub records: Vec<SpecRecord>,
}

impl SpecShipmentTable {
    /// Build a table from header names and raw rows, numbering rows in order.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(idx_row, values)| SpecRecord { idx_row, values })
            .collect();
        Self { columns, records }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of records.
    pub fn height(&self) -> usize {
        self.records.len()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Logical column roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSchema {
    /// Shipment identifier used for group and shipment keys.
    pub col_identifier: EnumColumnIdentifier,
    /// Carton identifier used for box numbering.
    pub col_carton: EnumColumnIdentifier,
    /// PO Number display field: secondary row sort key and gap-detector input.
    pub col_po_number: EnumColumnIdentifier,
    /// Item code pivoted against boxes. Optional.
    pub col_item_code: Option<EnumColumnIdentifier>,
    /// Quantity summed in pivots and totals. Optional.
    pub col_quantity: Option<EnumColumnIdentifier>,
}

impl Default for SpecSchema {
    fn default() -> Self {
        derive_default_schema()
    }
}

impl SpecSchema {
    /// Resolve every role against `columns` once, failing fast.
    pub fn resolve(&self, columns: &[String]) -> Result<SpecResolvedSchema, ShipmentReportError> {
        if columns.len() < N_NCOLS_INPUT_MIN {
            return Err(ShipmentReportError::MissingColumns {
                n_required: N_NCOLS_INPUT_MIN,
                n_found: columns.len(),
            });
        }

        let resolve_required = |role: &'static str, col: &EnumColumnIdentifier| {
            col.resolve(columns)
                .ok_or_else(|| ShipmentReportError::MissingColumn {
                    role,
                    column: col.to_string(),
                })
        };

        Ok(SpecResolvedSchema {
            idx_identifier: resolve_required("identifier", &self.col_identifier)?,
            idx_carton: resolve_required("carton", &self.col_carton)?,
            idx_po_number: resolve_required("po_number", &self.col_po_number)?,
            idx_item_code: self
                .col_item_code
                .as_ref()
                .and_then(|col| col.resolve(columns)),
            idx_quantity: self
                .col_quantity
                .as_ref()
                .and_then(|col| col.resolve(columns)),
        })
    }
}

/// Column roles resolved to zero-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecResolvedSchema {
    /// See [`SpecSchema::col_identifier`].
    pub idx_identifier: usize,
    /// See [`SpecSchema::col_carton`].
    pub idx_carton: usize,
    /// See [`SpecSchema::col_po_number`].
    pub idx_po_number: usize,
    /// See [`SpecSchema::col_item_code`].
    pub idx_item_code: Option<usize>,
    /// See [`SpecSchema::col_quantity`].
    pub idx_quantity: Option<usize>,
}

/// Fixed, ordered roster of handlers receiving PO assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRoster {
    /// Handler names; order is the remainder preference order.
    pub handlers: Vec<String>,
    /// Handlers receiving exactly the base share, never a remainder item.
    pub handlers_low_priority: Vec<String>,
    /// Handler guaranteed at least one assignment whenever there is a PO.
    pub handler_required: Option<String>,
}

impl Default for SpecRoster {
    fn default() -> Self {
        derive_default_roster()
    }
}

impl SpecRoster {
    /// Copy of this roster with `name` removed from every role.
    pub fn without(&self, name: &str) -> Self {
        Self {
            handlers: self
                .handlers
                .iter()
                .filter(|c_handler| *c_handler != name)
                .cloned()
                .collect(),
            handlers_low_priority: self
                .handlers_low_priority
                .iter()
                .filter(|c_handler| *c_handler != name)
                .cloned()
                .collect(),
            handler_required: self
                .handler_required
                .clone()
                .filter(|c_handler| c_handler != name),
        }
    }

    /// Handlers eligible for remainder assignments, in preference order.
    pub fn handlers_preferred(&self) -> Vec<&str> {
        self.handlers
            .iter()
            .filter(|c_handler| !self.is_low_priority(c_handler))
            .map(String::as_str)
            .collect()
    }

    /// Whether `name` is in the low-priority subset.
    pub fn is_low_priority(&self, name: &str) -> bool {
        self.handlers_low_priority.iter().any(|c_handler| c_handler == name)
    }

    /// Check roster consistency.
    pub fn validate(&self) -> Result<(), ShipmentReportError> {
        if self.handlers.is_empty() {
            return Err(ShipmentReportError::InvalidRoster(
                "roster must contain at least one handler.".to_string(),
            ));
        }
        for (n_idx, c_handler) in self.handlers.iter().enumerate() {
            if self.handlers[..n_idx].contains(c_handler) {
                return Err(ShipmentReportError::InvalidRoster(format!(
                    "duplicate handler {c_handler:?}."
                )));
            }
        }
        for c_handler in &self.handlers_low_priority {
            if !self.handlers.contains(c_handler) {
                return Err(ShipmentReportError::InvalidRoster(format!(
                    "low-priority handler {c_handler:?} is not in the roster."
                )));
            }
        }
        if let Some(c_handler) = &self.handler_required
            && !self.handlers.contains(c_handler)
        {
            return Err(ShipmentReportError::InvalidRoster(format!(
                "required handler {c_handler:?} is not in the roster."
            )));
        }
        if let Some(c_handler) = &self.handler_required
            && self.is_low_priority(c_handler)
        {
            return Err(ShipmentReportError::InvalidRoster(format!(
                "required handler {c_handler:?} cannot also be low-priority."
            )));
        }
        Ok(())
    }
}

/// Options for one synthesis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSynthesisOptions {
    /// Column roles.
    pub schema: SpecSchema,
    /// Handler roster.
    pub roster: SpecRoster,
    /// Group key length; shipment keys are one character longer.
    pub n_len_group_key: usize,
}

impl Default for SpecSynthesisOptions {
    fn default() -> Self {
        Self {
            schema: SpecSchema::default(),
            roster: SpecRoster::default(),
            n_len_group_key: N_LEN_GROUP_KEY,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DerivedViews

/// Group and shipment keys of one record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecRecordKeys {
    /// Identifier prefix partitioning records.
    pub group_key: String,
    /// Identifier prefix one character longer, ordering records in a group.
    pub shipment_key: String,
}

/// Records sharing one group key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRecordGroup {
    /// Shared group key.
    pub group_key: String,
    /// Identifier value of the first record seen for this key (original row order).
    pub identifier_full: String,
    /// Records ordered by shipment key, ties in original row order.
    pub records: Vec<SpecRecord>,
}

/// A record annotated with its box number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecBoxedRecord {
    /// One-based box number within the group.
    pub n_box: usize,
    /// The untouched input record.
    pub record: SpecRecord,
}

/// Item-code by box quantity aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecPivotTable {
    /// Row labels, ascending.
    pub item_codes: Vec<String>,
    /// Column labels, numerically ascending.
    pub boxes: Vec<usize>,
    /// Summed quantity per `(item_code, box)` pair that occurs in the group.
    pub cells: BTreeMap<(String, usize), i64>,
}

/// Workflow state of a canonical PO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumPoStatus {
    /// Neither link nor issue recorded.
    AwaitingUpload,
    /// Link recorded, no issue.
    Uploaded,
    /// An issue is recorded, with or without a link.
    WithIssue,
}

impl EnumPoStatus {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AwaitingUpload => C_STATUS_AWAITING_UPLOAD,
            Self::Uploaded => C_STATUS_UPLOADED,
            Self::WithIssue => C_STATUS_WITH_ISSUE,
        }
    }
}

impl std::fmt::Display for EnumPoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical PO paired with its handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAssignment {
    /// Canonical PO number.
    pub po_canonical: String,
    /// Assigned handler name.
    pub handler: String,
}

/// One line of the PO summary listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPoSummaryRow {
    /// Canonical PO number.
    pub po_canonical: String,
    /// Assigned handler.
    pub handler: String,
    /// External workflow link, if any.
    pub workflow_link: Option<String>,
    /// External issue note, if any.
    pub issue: Option<String>,
}

impl SpecPoSummaryRow {
    /// Current status, derived from the link and issue inputs on every call.
    pub fn status(&self) -> EnumPoStatus {
        derive_status(
            is_present(self.workflow_link.as_deref()),
            is_present(self.issue.as_deref()),
        )
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|c_val| !c_val.trim().is_empty())
}

/// Per-group output handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecGroupReport {
    /// Group key.
    pub group_key: String,
    /// Representative full identifier.
    pub identifier_full: String,
    /// Canonical PO derived from the full identifier.
    pub po_canonical: String,
    /// Handler assigned to the canonical PO.
    pub handler: Option<String>,
    /// Records sorted by box number, then PO Number text.
    pub rows: Vec<SpecBoxedRecord>,
    /// Distinct box count.
    pub n_boxes_total: usize,
    /// Sum of coerced quantities.
    pub n_quantity_total: i64,
    /// Whether shipment letters skip a letter after `A`.
    pub if_has_missing_shipment: bool,
    /// Item-code by box aggregation, when both columns exist.
    pub pivot: Option<SpecPivotTable>,
}

/// A quantity or box value that failed numeric coercion and counted as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCoercionWarning {
    /// Zero-based input row.
    pub idx_row: usize,
    /// Column name.
    pub column: String,
    /// Offending raw value.
    pub value: String,
}

impl std::fmt::Display for SpecCoercionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {}: column {:?} value {:?} is not numeric, counted as 0",
            self.idx_row, self.column, self.value
        )
    }
}

/// Complete synthesis output handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecShipmentReport {
    /// Input column names.
    pub columns: Vec<String>,
    /// Input records, untouched and in original order.
    pub records: Vec<SpecRecord>,
    /// Column roles resolved against `columns`.
    pub schema: SpecResolvedSchema,
    /// One row per distinct canonical PO, in listing order.
    pub po_summary: Vec<SpecPoSummaryRow>,
    /// One report per group, ordered by canonical PO.
    pub groups: Vec<SpecGroupReport>,
    /// Run counters and coercion warnings.
    pub report: ReportSynthesis,
}

impl SpecShipmentReport {
    /// Handler assigned to a canonical PO.
    pub fn handler_for(&self, po_canonical: &str) -> Option<&str> {
        self.po_summary
            .iter()
            .find(|row| row.po_canonical == po_canonical)
            .map(|row| row.handler.as_str())
    }

    /// Record or clear the workflow link of a canonical PO.
    ///
    /// Returns `false` when the PO is not listed.
    pub fn set_workflow_link(&mut self, po_canonical: &str, link: Option<String>) -> bool {
        match self.summary_row_mut(po_canonical) {
            Some(row) => {
                row.workflow_link = link;
                true
            }
            None => false,
        }
    }

    /// Record or clear the issue note of a canonical PO.
    ///
    /// Returns `false` when the PO is not listed.
    pub fn set_issue(&mut self, po_canonical: &str, issue: Option<String>) -> bool {
        match self.summary_row_mut(po_canonical) {
            Some(row) => {
                row.issue = issue;
                true
            }
            None => false,
        }
    }

    fn summary_row_mut(&mut self, po_canonical: &str) -> Option<&mut SpecPoSummaryRow> {
        self.po_summary
            .iter_mut()
            .find(|row| row.po_canonical == po_canonical)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Fatal synthesis errors; raised before any output is produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShipmentReportError {
    /// Input table is narrower than the minimum width.
    #[error("Input needs at least {n_required} columns, found {n_found}.")]
    MissingColumns {
        /// Minimum number of columns.
        n_required: usize,
        /// Number of columns present.
        n_found: usize,
    },
    /// A required column role cannot be resolved.
    #[error("Missing {role} column: {column}.")]
    MissingColumn {
        /// Logical role name.
        role: &'static str,
        /// Selector that failed to resolve.
        column: String,
    },
    /// Roster configuration is inconsistent.
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn schema_requires_three_columns() {
        let err = SpecSchema::default()
            .resolve(&cols(&["Carton", "PO"]))
            .unwrap_err();
        assert_eq!(
            err,
            ShipmentReportError::MissingColumns {
                n_required: 3,
                n_found: 2
            }
        );
    }

    #[test]
    fn schema_resolves_optional_roles_by_name() {
        let resolved = SpecSchema::default()
            .resolve(&cols(&["Carton Num", "UPC", "Shipment", "Qty"]))
            .unwrap();
        assert_eq!(resolved.idx_identifier, 2);
        assert_eq!(resolved.idx_carton, 0);
        assert_eq!(resolved.idx_po_number, 2);
        assert_eq!(resolved.idx_item_code, Some(1));
        assert_eq!(resolved.idx_quantity, Some(3));

        let resolved = SpecSchema::default()
            .resolve(&cols(&["a", "b", "c"]))
            .unwrap();
        assert_eq!(resolved.idx_item_code, None);
        assert_eq!(resolved.idx_quantity, None);
    }

    #[test]
    fn schema_reports_missing_named_role() {
        let schema = SpecSchema {
            col_carton: EnumColumnIdentifier::Name("Carton".to_string()),
            ..SpecSchema::default()
        };
        let err = schema.resolve(&cols(&["a", "b", "c"])).unwrap_err();
        assert!(matches!(
            err,
            ShipmentReportError::MissingColumn { role: "carton", .. }
        ));
    }

    #[test]
    fn roster_validation_and_exclusion() {
        let roster = SpecRoster::default();
        roster.validate().unwrap();
        assert_eq!(
            roster.handlers_preferred(),
            vec!["Paulo", "JB", "Stephanie", "Sunshine"]
        );

        let roster_excluded = roster.without("Orville");
        roster_excluded.validate().unwrap();
        assert_eq!(roster_excluded.handlers.len(), 4);
        assert!(roster_excluded.handlers_low_priority.is_empty());

        let roster_bad = SpecRoster {
            handler_required: Some("Nobody".to_string()),
            ..SpecRoster::default()
        };
        assert!(matches!(
            roster_bad.validate(),
            Err(ShipmentReportError::InvalidRoster(_))
        ));
        assert!(SpecRoster::default().without("x").validate().is_ok());
        assert!(
            SpecRoster {
                handlers: vec![],
                handlers_low_priority: vec![],
                handler_required: None
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn required_handler_cannot_be_low_priority() {
        let roster = SpecRoster {
            handlers: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            handlers_low_priority: vec!["C".to_string()],
            handler_required: Some("C".to_string()),
        };
        assert_eq!(
            roster.validate(),
            Err(ShipmentReportError::InvalidRoster(
                "required handler \"C\" cannot also be low-priority.".to_string()
            ))
        );
    }

    #[test]
    fn summary_row_status_follows_inputs() {
        let mut row = SpecPoSummaryRow {
            po_canonical: "PO1".to_string(),
            handler: "JB".to_string(),
            workflow_link: None,
            issue: None,
        };
        assert_eq!(row.status(), EnumPoStatus::AwaitingUpload);
        row.workflow_link = Some("https://example.test/po1".to_string());
        assert_eq!(row.status(), EnumPoStatus::Uploaded);
        row.issue = Some("short shipped".to_string());
        assert_eq!(row.status(), EnumPoStatus::WithIssue);
        row.workflow_link = Some("   ".to_string());
        assert_eq!(row.status(), EnumPoStatus::WithIssue);
        assert_eq!(row.status().to_string(), "WITH ISSUE");
    }
}
