//! `shipkit_io_xlsx` v1:
//! Table loader and XLSX report renderer around `shipkit_report`.
//!
//! - `conf`   : constants and default presets
//! - `spec`   : formats/options/errors
//! - `util`   : pure helper functions
//! - `reader` : spreadsheet and Arrow IPC loader
//! - `writer` : report workbook writer
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_SHEET_NAME_ORIGINAL, C_SHEET_NAME_PO_SUMMARY, EnumFmtKey, N_LEN_EXCEL_SHEET_NAME_MAX,
    N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL, derive_default_handler_colors,
    derive_default_report_write_options, derive_default_xlsx_formats,
};
pub use reader::{
    derive_dataframe_from_ipc_bytes, derive_shipment_table_from_dataframe,
    derive_shipment_table_from_range, read_shipment_table, read_shipment_table_from_bytes,
};
pub use spec::{SpecCellFormat, SpecReportWriteOptions, SpecXlsxReport, XlsxIoError};
pub use util::{
    derive_output_file_name, derive_output_file_name_now, derive_status_formula,
    sanitize_sheet_name,
};
pub use writer::{ShipmentReportWriter, write_shipment_report};
