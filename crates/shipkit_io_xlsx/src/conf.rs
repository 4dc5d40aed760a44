//! Workbook constants and default preset factories.

use std::collections::BTreeMap;

use crate::spec::{SpecCellFormat, SpecReportWriteOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Sheet holding the pass-through input records.
pub const C_SHEET_NAME_ORIGINAL: &str = "Original Data";
/// Sheet holding one row per canonical PO.
pub const C_SHEET_NAME_PO_SUMMARY: &str = "PO Summary";
/// PO Summary header labels, in column order.
pub const TUP_PO_SUMMARY_HEADERS: [&str; 5] =
    ["PO Number", "Assigned to", "Workflow Link", "Issues", "Status"];
/// PO Summary column widths, in column order.
pub const TUP_PO_SUMMARY_WIDTHS: [f64; 5] = [30.0, 18.0, 120.0, 30.0, 25.0];

/// Header of the box number column inserted into group sheets.
pub const C_COL_BOX: &str = "Box#";
pub const C_LABEL_TOTAL_BOXES: &str = "Total Number of Boxes:";
pub const C_LABEL_TOTAL_QUANTITY: &str = "Total Quantity:";
pub const C_LABEL_MISSING_SHIPMENT: &str = "With Missing PO Number";
pub const C_LABEL_PIVOT_ITEM: &str = "UPC";
pub const C_LABEL_PIVOT_TOTAL: &str = "Total";

/// Zero-based column of `Original Data` written as numbers.
pub const N_IDX_COL_NUMERIC_ORIGINAL: usize = 7;
/// Zero-based column of group sheets written as numbers (after `Box#` insertion).
pub const N_IDX_COL_NUMERIC_GROUP: usize = 8;
/// Zero-based column where the pivot block starts (column Q).
pub const N_IDX_COL_PIVOT_START: usize = 16;
/// Blank rows between the data block and the totals block, plus one.
pub const N_NROWS_TOTALS_OFFSET: usize = 3;

pub const N_WIDTH_AUTOFIT_MAX: usize = 50;
pub const N_WIDTH_AUTOFIT_PADDING: usize = 2;
pub const N_WIDTH_PIVOT_LABEL: f64 = 25.0;
pub const N_WIDTH_PIVOT_BOX: f64 = 12.0;

pub const C_COLOR_HEADER: &str = "#4472C4";
pub const C_COLOR_PIVOT: &str = "#CC6600";
pub const C_COLOR_ALERT: &str = "#FF0000";
pub const C_COLOR_TAB_FIXED: &str = "#000000";
pub const C_COLOR_STATUS_UPLOADED: &str = "#FFFF00";
pub const C_COLOR_STATUS_WITH_ISSUE: &str = "#FF0000";
pub const C_COLOR_STATUS_AWAITING_UPLOAD: &str = "#FFA500";

/// Output file name prefix.
pub const C_FILE_NAME_PREFIX: &str = "SMW Bulk Shipments";
/// Time zone of the output file name timestamp.
pub const C_FILE_NAME_TIMEZONE: &str = "America/Chicago";
/// strftime layout of the output file name timestamp.
pub const C_FILE_NAME_TIME_FORMAT: &str = "%Y-%m-%d %I-%M-%S %p";

/// Input file extensions read through calamine.
pub const TUP_EXT_SPREADSHEET: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];
/// Input file extensions read as Arrow IPC.
pub const TUP_EXT_ARROW_IPC: [&str; 3] = ["arrow", "ipc", "feather"];

/// Canonical format preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumFmtKey {
    /// Body text cell.
    Text,
    /// Body number cell.
    Number,
    /// Bold body text, used for totals.
    TextBold,
    /// Blue header cell.
    Header,
    /// Red header cell of the `Issues` column.
    HeaderAlert,
    /// Dark orange pivot header and totals.
    Pivot,
    /// PO Number cell of a group with a missing shipment.
    Highlight,
    /// Missing shipment warning line.
    Warning,
}

/// Build default format presets used by [`crate::writer::ShipmentReportWriter`].
pub fn derive_default_xlsx_formats() -> BTreeMap<EnumFmtKey, SpecCellFormat> {
    let cfg_base_fmt_spec = SpecCellFormat {
        border: Some(1),
        align: Some("center".to_string()),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    };
    let cfg_text_fmt_spec = cfg_base_fmt_spec.with_(SpecCellFormat {
        num_format: Some("@".to_string()),
        ..Default::default()
    });
    let cfg_banner_fmt_spec = cfg_base_fmt_spec.with_(SpecCellFormat {
        bold: Some(true),
        text_wrap: Some(true),
        font_color: Some("#FFFFFF".to_string()),
        ..Default::default()
    });

    let mut dict_fmt = BTreeMap::new();
    dict_fmt.insert(
        EnumFmtKey::Text,
        cfg_text_fmt_spec.with_(SpecCellFormat {
            locked: Some(false),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Number,
        cfg_base_fmt_spec.with_(SpecCellFormat {
            num_format: Some("0".to_string()),
            locked: Some(false),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::TextBold,
        cfg_text_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Header,
        cfg_banner_fmt_spec.with_(SpecCellFormat {
            bg_color: Some(C_COLOR_HEADER.to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::HeaderAlert,
        cfg_banner_fmt_spec.with_(SpecCellFormat {
            bg_color: Some(C_COLOR_ALERT.to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Pivot,
        cfg_banner_fmt_spec.with_(SpecCellFormat {
            bg_color: Some(C_COLOR_PIVOT.to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Highlight,
        cfg_text_fmt_spec.with_(SpecCellFormat {
            bg_color: Some(C_COLOR_ALERT.to_string()),
            font_color: Some("#FFFFFF".to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Warning,
        cfg_text_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            bg_color: Some(C_COLOR_ALERT.to_string()),
            font_color: Some("#FFFFFF".to_string()),
            ..Default::default()
        }),
    );

    dict_fmt
}

/// Build default handler fill colours, keyed by handler name.
pub fn derive_default_handler_colors() -> BTreeMap<String, String> {
    [
        ("Orville", "#FFFFE0"),
        ("Sunshine", "#ADD8E6"),
        ("Stephanie", "#FFDAB9"),
        ("Paulo", "#FFB6C1"),
        ("JB", "#90EE90"),
    ]
    .into_iter()
    .map(|(c_handler, c_color)| (c_handler.to_string(), c_color.to_string()))
    .collect()
}

/// Build default write options.
pub fn derive_default_report_write_options() -> SpecReportWriteOptions {
    SpecReportWriteOptions::default()
}
