//! XLSX report writer kernel that renders a synthesized shipment report.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use rust_xlsxwriter::{
    ConditionalFormatFormula, ConditionalFormatText, ConditionalFormatTextRule, Format,
    FormatAlign, FormatBorder, Formula, Workbook, Worksheet,
};
use shipkit_report::{
    EnumPoStatus, SpecGroupReport, SpecPivotTable, SpecPoSummaryRow, SpecShipmentReport,
};
use tracing::{debug, info, warn};

use crate::conf::{
    C_COL_BOX, C_COLOR_STATUS_AWAITING_UPLOAD, C_COLOR_STATUS_UPLOADED, C_COLOR_STATUS_WITH_ISSUE,
    C_COLOR_TAB_FIXED, C_LABEL_MISSING_SHIPMENT, C_LABEL_PIVOT_ITEM, C_LABEL_PIVOT_TOTAL,
    C_LABEL_TOTAL_BOXES, C_LABEL_TOTAL_QUANTITY, C_SHEET_NAME_ORIGINAL, C_SHEET_NAME_PO_SUMMARY,
    EnumFmtKey, N_NROWS_TOTALS_OFFSET, N_WIDTH_PIVOT_BOX, N_WIDTH_PIVOT_LABEL,
    TUP_PO_SUMMARY_HEADERS, TUP_PO_SUMMARY_WIDTHS, derive_default_xlsx_formats,
};
use crate::spec::{SpecCellFormat, SpecReportWriteOptions, SpecXlsxReport, XlsxIoError};
use crate::util::{
    cast_col_num, cast_row_num, derive_autofit_width, derive_group_sheet_column,
    derive_last_numeric_row, derive_status_formula, derive_unique_sheet_name, parse_finite_f64,
    sanitize_sheet_name,
};

/// Resolved `rust_xlsxwriter` formats for one workbook.
struct XlsxReportFormats {
    dict_formats: BTreeMap<EnumFmtKey, Format>,
    dict_handler_formats: BTreeMap<String, Format>,
    l_status_formats: Vec<(EnumPoStatus, Format)>,
    fmt_fallback: Format,
}

impl XlsxReportFormats {
    fn new(write_options: &SpecReportWriteOptions) -> Self {
        let mut dict_fmt_specs = derive_default_xlsx_formats();
        dict_fmt_specs.extend(write_options.formats.clone());
        let fmt_spec_text = dict_fmt_specs
            .get(&EnumFmtKey::Text)
            .cloned()
            .unwrap_or_default();

        let dict_handler_formats = write_options
            .handler_colors
            .iter()
            .map(|(c_handler, c_color)| {
                let fmt_spec = fmt_spec_text.with_(SpecCellFormat {
                    bg_color: Some(c_color.clone()),
                    ..Default::default()
                });
                (c_handler.clone(), derive_rust_xlsx_format(&fmt_spec))
            })
            .collect();

        let l_status_formats = [
            (EnumPoStatus::Uploaded, C_COLOR_STATUS_UPLOADED, None),
            (EnumPoStatus::WithIssue, C_COLOR_STATUS_WITH_ISSUE, Some("#FFFFFF")),
            (EnumPoStatus::AwaitingUpload, C_COLOR_STATUS_AWAITING_UPLOAD, None),
        ]
        .into_iter()
        .map(|(status, c_color, c_font_color)| {
            let fmt_spec = fmt_spec_text.with_(SpecCellFormat {
                bg_color: Some(c_color.to_string()),
                font_color: c_font_color.map(ToString::to_string),
                ..Default::default()
            });
            (status, derive_rust_xlsx_format(&fmt_spec))
        })
        .collect();

        Self {
            dict_formats: dict_fmt_specs
                .iter()
                .map(|(key, fmt_spec)| (*key, derive_rust_xlsx_format(fmt_spec)))
                .collect(),
            dict_handler_formats,
            l_status_formats,
            fmt_fallback: Format::new(),
        }
    }

    fn get(&self, key: EnumFmtKey) -> &Format {
        self.dict_formats.get(&key).unwrap_or(&self.fmt_fallback)
    }

    fn handler(&self, name: &str) -> &Format {
        self.dict_handler_formats
            .get(name)
            .unwrap_or_else(|| self.get(EnumFmtKey::Text))
    }
}

/// Stateful workbook writer.
pub struct ShipmentReportWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    formats: XlsxReportFormats,
    write_options: SpecReportWriteOptions,
    set_sheet_names_existing: BTreeSet<String>,
    report: SpecXlsxReport,
    if_closed: bool,
}

impl ShipmentReportWriter {
    /// Create writer bound to output path and options.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: PathBuf, write_options: SpecReportWriteOptions) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            formats: XlsxReportFormats::new(&write_options),
            write_options,
            set_sheet_names_existing: BTreeSet::new(),
            report: SpecXlsxReport::default(),
            if_closed: false,
        }
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Return snapshot of the write report.
    pub fn report(&self) -> SpecXlsxReport {
        self.report.clone()
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), XlsxIoError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        info!(
            "wrote {} sheets to {}",
            self.report.sheets.len(),
            self.path_file_out.display()
        );
        Ok(())
    }

    /// Serialize the workbook without touching the output path.
    pub fn save_to_buffer(&mut self) -> Result<Vec<u8>, XlsxIoError> {
        Ok(self.workbook.save_to_buffer()?)
    }

    /// Render the whole report: original data, PO summary, then one sheet per group.
    pub fn write_report(&mut self, report: &SpecShipmentReport) -> Result<(), XlsxIoError> {
        if self.if_closed {
            return Err(XlsxIoError::Closed);
        }

        let c_sheet_name = self.reserve_sheet_name(C_SHEET_NAME_ORIGINAL);
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&c_sheet_name)?;
        write_original_sheet(worksheet, &self.formats, &self.write_options, report)?;
        self.report.sheets.push(c_sheet_name);

        let c_sheet_name = self.reserve_sheet_name(C_SHEET_NAME_PO_SUMMARY);
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&c_sheet_name)?;
        write_po_summary_sheet(worksheet, &self.formats, &self.write_options, &report.po_summary)?;
        self.report.sheets.push(c_sheet_name);

        for group in &report.groups {
            let c_sheet_name_base = sanitize_sheet_name(&group.po_canonical, "_");
            let c_sheet_name = self.reserve_sheet_name(&c_sheet_name_base);
            if c_sheet_name != c_sheet_name_base {
                let c_msg = format!(
                    "sheet {c_sheet_name_base:?} already exists, group {:?} written to {c_sheet_name:?}",
                    group.group_key
                );
                warn!("{c_msg}");
                self.report.warn(c_msg);
            }

            let worksheet = self.workbook.add_worksheet();
            worksheet.set_name(&c_sheet_name)?;
            if let Some(c_color) = group
                .handler
                .as_ref()
                .and_then(|c_handler| self.write_options.handler_colors.get(c_handler))
            {
                worksheet.set_tab_color(c_color.as_str());
            }
            write_group_sheet(
                worksheet,
                &self.formats,
                &self.write_options,
                &report.columns,
                report.schema.idx_po_number,
                group,
                &mut self.report,
            )?;
            debug!("sheet {c_sheet_name:?}: {} rows", group.rows.len());
            self.report.sheets.push(c_sheet_name);
        }

        Ok(())
    }

    fn reserve_sheet_name(&mut self, name: &str) -> String {
        derive_unique_sheet_name(&mut self.set_sheet_names_existing, name)
    }
}

/// Render `report` into a new workbook at `path_file_out`.
pub fn write_shipment_report(
    report: &SpecShipmentReport,
    path_file_out: PathBuf,
    write_options: SpecReportWriteOptions,
) -> Result<SpecXlsxReport, XlsxIoError> {
    let mut writer = ShipmentReportWriter::new(path_file_out, write_options);
    writer.write_report(report)?;
    writer.close()?;
    Ok(writer.report())
}

////////////////////////////////////////////////////////////////////////////////
// #region Sheets

fn write_original_sheet(
    worksheet: &mut Worksheet,
    formats: &XlsxReportFormats,
    write_options: &SpecReportWriteOptions,
    report: &SpecShipmentReport,
) -> Result<(), XlsxIoError> {
    worksheet.set_tab_color(C_COLOR_TAB_FIXED);
    write_header_row(worksheet, &report.columns, formats.get(EnumFmtKey::Header))?;

    let n_width = report.columns.len();
    let numeric_col = derive_numeric_column(
        write_options.idx_col_numeric_original,
        n_width,
        |idx_col| {
            report
                .records
                .iter()
                .map(move |record| record.value(idx_col))
                .collect()
        },
    );

    for (n_idx_row, record) in report.records.iter().enumerate() {
        for n_idx_col in 0..n_width {
            write_body_cell(
                worksheet,
                formats,
                n_idx_row,
                n_idx_col,
                record.value(n_idx_col),
                numeric_col.as_ref(),
                formats.get(EnumFmtKey::Text),
            )?;
        }
    }

    for (n_idx_col, c_header) in report.columns.iter().enumerate() {
        let n_width_col = derive_autofit_width(
            c_header,
            report.records.iter().map(|record| record.value(n_idx_col)),
            write_options,
        );
        worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width_col)?;
    }

    Ok(())
}

fn write_po_summary_sheet(
    worksheet: &mut Worksheet,
    formats: &XlsxReportFormats,
    write_options: &SpecReportWriteOptions,
    rows: &[SpecPoSummaryRow],
) -> Result<(), XlsxIoError> {
    worksheet.set_tab_color(C_COLOR_TAB_FIXED);
    for (n_idx_col, c_header) in TUP_PO_SUMMARY_HEADERS.iter().enumerate() {
        let fmt_header = if n_idx_col == 3 {
            formats.get(EnumFmtKey::HeaderAlert)
        } else {
            formats.get(EnumFmtKey::Header)
        };
        worksheet.write_string_with_format(0, cast_col_num(n_idx_col)?, *c_header, fmt_header)?;
    }

    let fmt_text = formats.get(EnumFmtKey::Text);
    for (n_idx, row) in rows.iter().enumerate() {
        let n_row = cast_row_num(n_idx + 1)?;
        let fmt_handler = formats.handler(&row.handler);
        worksheet.write_string_with_format(n_row, 0, &row.po_canonical, fmt_handler)?;
        worksheet.write_string_with_format(n_row, 1, &row.handler, fmt_handler)?;
        write_optional_text(worksheet, n_row, 2, row.workflow_link.as_deref(), fmt_text)?;
        write_optional_text(worksheet, n_row, 3, row.issue.as_deref(), fmt_text)?;

        let formula = Formula::new(derive_status_formula(n_idx + 2)).set_result(row.status().label());
        worksheet.write_formula_with_format(n_row, 4, formula, fmt_text)?;
    }

    if !rows.is_empty() {
        let n_row_last = cast_row_num(rows.len())?;

        for (status, fmt_status) in &formats.l_status_formats {
            let conditional_format = ConditionalFormatText::new()
                .set_rule(ConditionalFormatTextRule::Contains(status.label().to_string()))
                .set_format(fmt_status);
            worksheet.add_conditional_format(1, 4, n_row_last, 4, &conditional_format)?;
        }

        for c_handler in write_options.handler_colors.keys() {
            let fmt_handler = formats.handler(c_handler);
            let conditional_format = ConditionalFormatText::new()
                .set_rule(ConditionalFormatTextRule::Contains(c_handler.clone()))
                .set_format(fmt_handler);
            worksheet.add_conditional_format(1, 1, n_row_last, 1, &conditional_format)?;

            let conditional_format = ConditionalFormatFormula::new()
                .set_rule(format!("=$B2=\"{c_handler}\"").as_str())
                .set_format(fmt_handler);
            worksheet.add_conditional_format(1, 0, n_row_last, 0, &conditional_format)?;
        }
    }

    for (n_idx_col, n_width_col) in TUP_PO_SUMMARY_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(cast_col_num(n_idx_col)?, *n_width_col)?;
    }

    Ok(())
}

fn write_group_sheet(
    worksheet: &mut Worksheet,
    formats: &XlsxReportFormats,
    write_options: &SpecReportWriteOptions,
    columns: &[String],
    idx_po_number: usize,
    group: &SpecGroupReport,
    xlsx_report: &mut SpecXlsxReport,
) -> Result<(), XlsxIoError> {
    let l_columns_layout = derive_group_sheet_columns(columns);
    let l_rows_layout: Vec<Vec<String>> = group
        .rows
        .iter()
        .map(|row| {
            let mut l_values: Vec<String> =
                (0..columns.len()).map(|idx_col| row.record.value(idx_col).to_string()).collect();
            l_values.insert(usize::min(1, l_values.len()), row.n_box.to_string());
            l_values
        })
        .collect();
    let n_width = l_columns_layout.len();

    write_header_row(worksheet, &l_columns_layout, formats.get(EnumFmtKey::Header))?;

    let numeric_col = derive_numeric_column(
        write_options.idx_col_numeric_group,
        n_width,
        |idx_col| {
            l_rows_layout
                .iter()
                .map(|l_values| l_values[idx_col].as_str())
                .collect()
        },
    );
    let idx_col_po = derive_group_sheet_column(idx_po_number);

    for (n_idx_row, l_values) in l_rows_layout.iter().enumerate() {
        for (n_idx_col, c_val) in l_values.iter().enumerate() {
            let fmt_text = if group.if_has_missing_shipment && n_idx_col == idx_col_po {
                formats.get(EnumFmtKey::Highlight)
            } else {
                formats.get(EnumFmtKey::Text)
            };
            write_body_cell(
                worksheet,
                formats,
                n_idx_row,
                n_idx_col,
                c_val,
                numeric_col.as_ref(),
                fmt_text,
            )?;
        }
    }

    for (n_idx_col, c_header) in l_columns_layout.iter().enumerate() {
        let n_width_col = derive_autofit_width(
            c_header,
            l_rows_layout.iter().map(|l_values| l_values[n_idx_col].as_str()),
            write_options,
        );
        worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width_col)?;
    }

    let n_row_totals = group.rows.len() + N_NROWS_TOTALS_OFFSET;
    let fmt_header = formats.get(EnumFmtKey::Header);
    let fmt_bold = formats.get(EnumFmtKey::TextBold);
    worksheet.write_string_with_format(cast_row_num(n_row_totals)?, 0, C_LABEL_TOTAL_BOXES, fmt_header)?;
    worksheet.write_string_with_format(
        cast_row_num(n_row_totals)?,
        1,
        group.n_boxes_total.to_string(),
        fmt_bold,
    )?;
    worksheet.write_string_with_format(
        cast_row_num(n_row_totals + 1)?,
        0,
        C_LABEL_TOTAL_QUANTITY,
        fmt_header,
    )?;
    worksheet.write_string_with_format(
        cast_row_num(n_row_totals + 1)?,
        1,
        group.n_quantity_total.to_string(),
        fmt_bold,
    )?;
    if group.if_has_missing_shipment {
        let fmt_warning = formats.get(EnumFmtKey::Warning);
        worksheet.write_string_with_format(
            cast_row_num(n_row_totals + 2)?,
            0,
            C_LABEL_MISSING_SHIPMENT,
            fmt_warning,
        )?;
        worksheet.write_blank(cast_row_num(n_row_totals + 2)?, 1, fmt_warning)?;
    }

    if let Some(pivot) = &group.pivot {
        let mut n_col_pivot = write_options.idx_col_pivot_start;
        if n_col_pivot <= n_width {
            n_col_pivot = n_width + 1;
            let c_msg = format!(
                "group {:?} has {n_width} columns, pivot moved to column {n_col_pivot}",
                group.group_key
            );
            warn!("{c_msg}");
            xlsx_report.warn(c_msg);
        }
        write_pivot_block(worksheet, formats, pivot, n_col_pivot)?;
    }

    Ok(())
}

fn write_pivot_block(
    worksheet: &mut Worksheet,
    formats: &XlsxReportFormats,
    pivot: &SpecPivotTable,
    n_col_start: usize,
) -> Result<(), XlsxIoError> {
    let fmt_pivot = formats.get(EnumFmtKey::Pivot);
    let fmt_text = formats.get(EnumFmtKey::Text);
    let fmt_bold = formats.get(EnumFmtKey::TextBold);
    let n_col_total = n_col_start + 1 + pivot.boxes.len();

    worksheet.write_string_with_format(0, cast_col_num(n_col_start)?, C_LABEL_PIVOT_ITEM, fmt_pivot)?;
    for (n_idx, n_box) in pivot.boxes.iter().enumerate() {
        worksheet.write_string_with_format(
            0,
            cast_col_num(n_col_start + 1 + n_idx)?,
            format!("Box {n_box}"),
            fmt_pivot,
        )?;
    }
    worksheet.write_string_with_format(0, cast_col_num(n_col_total)?, C_LABEL_PIVOT_TOTAL, fmt_pivot)?;

    for (n_idx_item, c_item_code) in pivot.item_codes.iter().enumerate() {
        let n_row = n_idx_item + 1;
        worksheet.write_string_with_format(
            cast_row_num(n_row)?,
            cast_col_num(n_col_start)?,
            c_item_code,
            fmt_text,
        )?;
        for (n_idx, n_box) in pivot.boxes.iter().enumerate() {
            write_quantity_cell(
                worksheet,
                n_row,
                n_col_start + 1 + n_idx,
                pivot.cell(c_item_code, *n_box),
                fmt_text,
            )?;
        }
        write_quantity_cell(worksheet, n_row, n_col_total, pivot.row_total(c_item_code), fmt_bold)?;
    }

    let n_row_total = pivot.item_codes.len() + 1;
    worksheet.write_string_with_format(
        cast_row_num(n_row_total)?,
        cast_col_num(n_col_start)?,
        C_LABEL_PIVOT_TOTAL,
        fmt_pivot,
    )?;
    for (n_idx, n_box) in pivot.boxes.iter().enumerate() {
        write_quantity_cell(
            worksheet,
            n_row_total,
            n_col_start + 1 + n_idx,
            pivot.col_total(*n_box),
            fmt_pivot,
        )?;
    }
    worksheet.write_string_with_format(
        cast_row_num(n_row_total)?,
        cast_col_num(n_col_total)?,
        pivot.grand_total().to_string(),
        fmt_pivot,
    )?;

    worksheet.set_column_width(cast_col_num(n_col_start)?, N_WIDTH_PIVOT_LABEL)?;
    for n_idx_col in (n_col_start + 1)..=n_col_total {
        worksheet.set_column_width(cast_col_num(n_idx_col)?, N_WIDTH_PIVOT_BOX)?;
    }

    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Cells

/// Body column written as numbers up to its last numeric row.
struct SpecNumericColumn {
    idx_col: usize,
    n_row_last: Option<usize>,
}

fn derive_numeric_column<'a>(
    idx_col: Option<usize>,
    n_width: usize,
    values_of: impl FnOnce(usize) -> Vec<&'a str>,
) -> Option<SpecNumericColumn> {
    let idx_col = idx_col.filter(|idx_col| *idx_col < n_width)?;
    let l_values = values_of(idx_col);
    Some(SpecNumericColumn {
        idx_col,
        n_row_last: derive_last_numeric_row(l_values.into_iter()),
    })
}

/// Write one body cell at data row `n_idx_row` (0-based, below the header).
///
/// Blank cells of the numeric column are skipped so they carry no border.
fn write_body_cell(
    worksheet: &mut Worksheet,
    formats: &XlsxReportFormats,
    n_idx_row: usize,
    n_idx_col: usize,
    value: &str,
    numeric_col: Option<&SpecNumericColumn>,
    fmt_text: &Format,
) -> Result<(), XlsxIoError> {
    let n_row = cast_row_num(n_idx_row + 1)?;
    let n_col = cast_col_num(n_idx_col)?;

    if let Some(numeric_col) = numeric_col
        && numeric_col.idx_col == n_idx_col
    {
        if value.trim().is_empty() {
            return Ok(());
        }
        if numeric_col.n_row_last.is_some_and(|n_row_last| n_idx_row <= n_row_last)
            && let Some(n_val) = parse_finite_f64(value)
        {
            worksheet.write_number_with_format(n_row, n_col, n_val, formats.get(EnumFmtKey::Number))?;
            return Ok(());
        }
    }

    worksheet.write_string_with_format(n_row, n_col, value, fmt_text)?;
    Ok(())
}

fn write_header_row(
    worksheet: &mut Worksheet,
    columns: &[String],
    fmt_header: &Format,
) -> Result<(), XlsxIoError> {
    for (n_idx_col, c_header) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, cast_col_num(n_idx_col)?, c_header, fmt_header)?;
    }
    Ok(())
}

/// Whitespace-only text is written blank so the status formula agrees with
/// the cached status.
fn write_optional_text(
    worksheet: &mut Worksheet,
    n_row: u32,
    n_col: u16,
    value: Option<&str>,
    format: &Format,
) -> Result<(), XlsxIoError> {
    match value {
        Some(c_val) if !c_val.trim().is_empty() => {
            worksheet.write_string_with_format(n_row, n_col, c_val, format)?;
        }
        _ => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
    }
    Ok(())
}

/// Quantities are written as text; zero renders blank.
fn write_quantity_cell(
    worksheet: &mut Worksheet,
    n_row: usize,
    n_col: usize,
    n_quantity: i64,
    format: &Format,
) -> Result<(), XlsxIoError> {
    let (n_row, n_col) = (cast_row_num(n_row)?, cast_col_num(n_col)?);
    if n_quantity == 0 {
        worksheet.write_blank(n_row, n_col, format)?;
    } else {
        worksheet.write_string_with_format(n_row, n_col, n_quantity.to_string(), format)?;
    }
    Ok(())
}

fn derive_group_sheet_columns(columns: &[String]) -> Vec<String> {
    let mut l_columns = columns.to_vec();
    l_columns.insert(usize::min(1, l_columns.len()), C_COL_BOX.to_string());
    l_columns
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatConversion

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }
    if spec.locked == Some(false) {
        format = format.set_unlocked();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
