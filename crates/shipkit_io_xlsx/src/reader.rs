//! Table loader: spreadsheet workbooks and Arrow IPC into a text-only shipment table.

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use polars::prelude::{AnyValue, DataFrame, IpcReader, SerReader};
use shipkit_report::SpecShipmentTable;
use tracing::debug;

use crate::conf::{TUP_EXT_ARROW_IPC, TUP_EXT_SPREADSHEET};
use crate::spec::XlsxIoError;
use crate::util::derive_text_from_f64;

/// Read a shipment table, picking the reader from the file extension.
///
/// Spreadsheets use their first worksheet with the first row as header.
pub fn read_shipment_table(path: impl AsRef<Path>) -> Result<SpecShipmentTable, XlsxIoError> {
    let path = path.as_ref();
    let c_ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let table = if TUP_EXT_SPREADSHEET.contains(&c_ext.as_str()) {
        let workbook = open_workbook_auto(path)?;
        derive_shipment_table_from_workbook(workbook, &path.to_string_lossy())?
    } else if TUP_EXT_ARROW_IPC.contains(&c_ext.as_str()) {
        let df = IpcReader::new(File::open(path)?).finish()?;
        derive_shipment_table_from_dataframe(&df)?
    } else {
        return Err(XlsxIoError::UnsupportedFormat(path.to_string_lossy().to_string()));
    };

    debug!(
        "read {} rows x {} columns from {}",
        table.height(),
        table.width(),
        path.display()
    );
    Ok(table)
}

/// Read a shipment table from in-memory spreadsheet bytes.
pub fn read_shipment_table_from_bytes(bytes: &[u8]) -> Result<SpecShipmentTable, XlsxIoError> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    derive_shipment_table_from_workbook(workbook, "<memory>")
}

fn derive_shipment_table_from_workbook<RS: Read + Seek>(
    mut workbook: Sheets<RS>,
    source: &str,
) -> Result<SpecShipmentTable, XlsxIoError> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| XlsxIoError::EmptyWorkbook(source.to_string()))??;
    Ok(derive_shipment_table_from_range(&range))
}

/// Convert a worksheet range into a table; the first used row is the header.
///
/// Leading empty columns are kept so positional roles still line up, and rows
/// with no content are dropped.
pub fn derive_shipment_table_from_range(range: &Range<Data>) -> SpecShipmentTable {
    let n_col_offset = range.start().map(|(_, n_col)| n_col as usize).unwrap_or(0);

    let mut l_rows = range.rows().map(|row| {
        std::iter::repeat_n(String::new(), n_col_offset)
            .chain(row.iter().map(derive_text_from_data))
            .collect::<Vec<String>>()
    });

    let Some(l_header) = l_rows.next() else {
        return SpecShipmentTable::default();
    };
    let columns = derive_column_names(l_header);
    let rows = l_rows
        .filter(|row| row.iter().any(|c_val| !c_val.is_empty()))
        .collect();

    SpecShipmentTable::new(columns, rows)
}

/// Convert a dataframe into a table, rendering every cell as text.
pub fn derive_shipment_table_from_dataframe(df: &DataFrame) -> Result<SpecShipmentTable, XlsxIoError> {
    let columns: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    let l_cols = df.get_columns();

    let mut rows = Vec::with_capacity(df.height());
    for n_idx_row in 0..df.height() {
        let mut l_row = Vec::with_capacity(l_cols.len());
        for col in l_cols {
            l_row.push(derive_text_from_any_value(col.get(n_idx_row)?));
        }
        rows.push(l_row);
    }

    Ok(SpecShipmentTable::new(columns, rows))
}

/// Decode Polars IPC bytes into a dataframe.
pub fn derive_dataframe_from_ipc_bytes(v_ipc_df: &[u8]) -> Result<DataFrame, XlsxIoError> {
    Ok(IpcReader::new(Cursor::new(v_ipc_df)).finish()?)
}

fn derive_column_names(header: Vec<String>) -> Vec<String> {
    header
        .into_iter()
        .enumerate()
        .map(|(n_idx, c_name)| {
            if c_name.trim().is_empty() {
                format!("Unnamed: {n_idx}")
            } else {
                c_name
            }
        })
        .collect()
}

fn derive_text_from_data(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        Data::String(val) => val.clone(),
        Data::Float(val) => derive_text_from_f64(*val),
        Data::Int(val) => val.to_string(),
        Data::Bool(val) => String::from(if *val { "True" } else { "False" }),
        other => other.to_string(),
    }
}

fn derive_text_from_any_value(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(val) => val.to_string(),
        AnyValue::StringOwned(val) => val.to_string(),
        AnyValue::Boolean(val) => String::from(if val { "True" } else { "False" }),
        AnyValue::Float32(val) => derive_text_from_f64(val as f64),
        AnyValue::Float64(val) => derive_text_from_f64(val),
        other => other.to_string(),
    }
}
