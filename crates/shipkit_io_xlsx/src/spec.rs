//! Workbook format models, write options and I/O error types.

use std::collections::BTreeMap;

use polars::prelude::PolarsError;
use rust_xlsxwriter::XlsxError;
use shipkit_report::ShipmentReportError;
use thiserror::Error;

use crate::conf::{
    C_FILE_NAME_PREFIX, C_FILE_NAME_TIMEZONE, EnumFmtKey, N_IDX_COL_NUMERIC_GROUP,
    N_IDX_COL_NUMERIC_ORIGINAL, N_IDX_COL_PIVOT_START, N_WIDTH_AUTOFIT_MAX,
    N_WIDTH_AUTOFIT_PADDING, derive_default_handler_colors, derive_default_xlsx_formats,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format preset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
    /// Cell protection; `Some(false)` leaves the cell editable on a protected sheet.
    pub locked: Option<bool>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
            locked: other.locked.or(self.locked),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Renderer options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecReportWriteOptions {
    /// Zero-based column where the pivot block starts; moved right when data would overlap.
    pub idx_col_pivot_start: usize,
    /// Maximum autofit width.
    pub width_autofit_max: usize,
    /// Width padding added after inference.
    pub width_autofit_padding: usize,
    /// Column of `Original Data` written as numbers.
    pub idx_col_numeric_original: Option<usize>,
    /// Column of group sheets written as numbers, counted after `Box#` insertion.
    pub idx_col_numeric_group: Option<usize>,
    /// Fill colour per handler name, used for summary cells and group tabs.
    pub handler_colors: BTreeMap<String, String>,
    /// Format presets.
    pub formats: BTreeMap<EnumFmtKey, SpecCellFormat>,
    /// Output file name prefix.
    pub file_name_prefix: String,
    /// IANA time zone of the output file name timestamp.
    pub file_name_timezone: String,
}

impl Default for SpecReportWriteOptions {
    fn default() -> Self {
        Self {
            idx_col_pivot_start: N_IDX_COL_PIVOT_START,
            width_autofit_max: N_WIDTH_AUTOFIT_MAX,
            width_autofit_padding: N_WIDTH_AUTOFIT_PADDING,
            idx_col_numeric_original: Some(N_IDX_COL_NUMERIC_ORIGINAL),
            idx_col_numeric_group: Some(N_IDX_COL_NUMERIC_GROUP),
            handler_colors: derive_default_handler_colors(),
            formats: derive_default_xlsx_formats(),
            file_name_prefix: C_FILE_NAME_PREFIX.to_string(),
            file_name_timezone: C_FILE_NAME_TIMEZONE.to_string(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-workbook write report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Sheet names in workbook order.
    pub sheets: Vec<String>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Loader and renderer errors.
#[derive(Debug, Error)]
pub enum XlsxIoError {
    /// Input table failed validation.
    #[error(transparent)]
    Report(#[from] ShipmentReportError),
    /// Workbook write failure.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),
    /// Spreadsheet read failure.
    #[error("spreadsheet read error: {0}")]
    Calamine(#[from] calamine::Error),
    /// Arrow IPC read failure.
    #[error("arrow read error: {0}")]
    Polars(#[from] PolarsError),
    /// File system failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Input extension is not a readable table format.
    #[error("Unsupported input format: {0:?}.")]
    UnsupportedFormat(String),
    /// Workbook has no worksheet to read.
    #[error("Workbook has no worksheet: {0}.")]
    EmptyWorkbook(String),
    /// Row or column position does not fit the worksheet grid.
    #[error("{0}")]
    IndexOverflow(String),
    /// Option value cannot be used.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
    /// Writer was used after `close()`.
    #[error("Cannot write after close().")]
    Closed,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
