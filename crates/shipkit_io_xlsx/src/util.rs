//! Stateless helper utilities used by the loader and the report writer.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::conf::{C_FILE_NAME_TIME_FORMAT, N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};
use crate::spec::{SpecReportWriteOptions, XlsxIoError};

////////////////////////////////////////////////////////////////////////////////
// #region CellText

/// Render a float the way a text-typed reader shows it: integral values lose
/// their decimal part, non-finite values become blank.
pub fn derive_text_from_f64(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return (value as i64).to_string();
    }
    value.to_string()
}

/// Parse text as a finite number; blank and non-numeric text give `None`.
pub fn parse_finite_f64(value: &str) -> Option<f64> {
    let c_val = value.trim();
    if c_val.is_empty() {
        return None;
    }
    c_val.parse::<f64>().ok().filter(|n_val| n_val.is_finite())
}

/// Index of the last value that parses as a finite number.
pub fn derive_last_numeric_row<'a>(values: impl DoubleEndedIterator<Item = &'a str> + ExactSizeIterator) -> Option<usize> {
    let n_len = values.len();
    values
        .rev()
        .position(|c_val| parse_finite_f64(c_val).is_some())
        .map(|n_from_end| n_len - 1 - n_from_end)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Create suffixed sheet name (`base_1`, `base_2`, ...), respecting length cap.
pub fn create_sheet_identifier(base_name: &str, part_idx_1based: usize) -> String {
    let c_sheet_name_suffix = format!("_{part_idx_1based}");
    let n_len_base_name_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_sheet_name_suffix.len());

    let c_sheet_name_base: String = base_name
        .chars()
        .take(usize::max(1, n_len_base_name_max))
        .collect();

    format!("{c_sheet_name_base}{c_sheet_name_suffix}")
}

/// Reserve `name` in `names_existing`, suffixing `_2`, `_3`, ... on collision.
///
/// Excel compares sheet names case-insensitively, so `names_existing` holds
/// lowercased names.
pub fn derive_unique_sheet_name(names_existing: &mut BTreeSet<String>, name: &str) -> String {
    if names_existing.insert(name.to_lowercase()) {
        return name.to_string();
    }

    let mut n_idx = 2usize;
    loop {
        let candidate = create_sheet_identifier(name, n_idx);
        if names_existing.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n_idx += 1;
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Layout

/// Estimate displayed width units of a text value.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

/// Autofit width of one column from its header and body texts.
pub fn derive_autofit_width<'a>(
    header: &str,
    values: impl IntoIterator<Item = &'a str>,
    options: &SpecReportWriteOptions,
) -> f64 {
    let n_width = values
        .into_iter()
        .map(estimate_unicode_string_width)
        .fold(estimate_unicode_string_width(header), usize::max);
    usize::min(n_width + options.width_autofit_padding, options.width_autofit_max) as f64
}

/// Position of input column `idx_col` in a group sheet, where `Box#` sits at 1.
pub fn derive_group_sheet_column(idx_col: usize) -> usize {
    if idx_col == 0 { 0 } else { idx_col + 1 }
}

/// Status formula of a PO Summary row; `n_row_excel` is 1-based.
pub fn derive_status_formula(n_row_excel: usize) -> String {
    let c = format!("C{n_row_excel}");
    let d = format!("D{n_row_excel}");
    format!(
        "=IF(AND({c}=\"\",{d}=\"\"),\"AWAITING UPLOAD\",\
         IF(AND({c}=\"\",{d}<>\"\"),\"WITH ISSUE\",\
         IF(AND({c}<>\"\",{d}<>\"\"),\"WITH ISSUE\",\"UPLOADED\")))"
    )
}

pub(crate) fn cast_row_num(value: usize) -> Result<u32, XlsxIoError> {
    u32::try_from(value).map_err(|_| XlsxIoError::IndexOverflow(format!("row index overflow: {value}")))
}

pub(crate) fn cast_col_num(value: usize) -> Result<u16, XlsxIoError> {
    u16::try_from(value)
        .map_err(|_| XlsxIoError::IndexOverflow(format!("column index overflow: {value}")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileName

/// Output file name stamped with `now`.
pub fn derive_output_file_name<T: TimeZone>(prefix: &str, now: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    format!("{prefix} {}.xlsx", now.format(C_FILE_NAME_TIME_FORMAT))
}

/// Output file name stamped with the current time in the configured time zone.
pub fn derive_output_file_name_now(options: &SpecReportWriteOptions) -> Result<String, XlsxIoError> {
    let tz: Tz = options.file_name_timezone.parse().map_err(|err| {
        XlsxIoError::InvalidOption(format!(
            "unknown time zone {:?}: {err}",
            options.file_name_timezone
        ))
    })?;
    Ok(derive_output_file_name(
        &options.file_name_prefix,
        &Utc::now().with_timezone(&tz),
    ))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn float_text_drops_integral_decimal_part() {
        assert_eq!(derive_text_from_f64(123.0), "123");
        assert_eq!(derive_text_from_f64(-4.0), "-4");
        assert_eq!(derive_text_from_f64(1.25), "1.25");
        assert_eq!(derive_text_from_f64(f64::NAN), "");
    }

    #[test]
    fn last_numeric_row_skips_trailing_text() {
        let l_values = ["1", "", "2.5", "n/a", ""];
        assert_eq!(derive_last_numeric_row(l_values.iter().copied()), Some(2));
        assert_eq!(derive_last_numeric_row(["x", ""].iter().copied()), None);
        assert_eq!(derive_last_numeric_row(Vec::<&str>::new().into_iter()), None);
    }

    #[test]
    fn sheet_names_are_sanitized_and_unique() {
        assert_eq!(sanitize_sheet_name("PO/123:A", "_"), "PO_123_A");
        assert_eq!(sanitize_sheet_name("  ", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40), "_").len(), 31);

        let mut set_names = BTreeSet::new();
        assert_eq!(derive_unique_sheet_name(&mut set_names, "PO Summary"), "PO Summary");
        assert_eq!(derive_unique_sheet_name(&mut set_names, "po summary"), "po summary_2");
        assert_eq!(derive_unique_sheet_name(&mut set_names, "PO1"), "PO1");
        assert_eq!(derive_unique_sheet_name(&mut set_names, "PO1"), "PO1_2");
        assert_eq!(derive_unique_sheet_name(&mut set_names, "PO1"), "PO1_3");

        let c_long = "y".repeat(31);
        let c_unique = derive_unique_sheet_name(&mut set_names, &c_long);
        assert_eq!(c_unique, c_long);
        let c_unique = derive_unique_sheet_name(&mut set_names, &c_long);
        assert_eq!(c_unique, format!("{}_2", "y".repeat(29)));
    }

    #[test]
    fn status_formula_references_its_row() {
        assert_eq!(
            derive_status_formula(2),
            "=IF(AND(C2=\"\",D2=\"\"),\"AWAITING UPLOAD\",\
             IF(AND(C2=\"\",D2<>\"\"),\"WITH ISSUE\",\
             IF(AND(C2<>\"\",D2<>\"\"),\"WITH ISSUE\",\"UPLOADED\")))"
        );
    }

    #[test]
    fn autofit_width_is_padded_and_capped() {
        let options = SpecReportWriteOptions::default();
        assert_eq!(derive_autofit_width("Qty", ["1", "12345"], &options), 7.0);
        let c_long = "z".repeat(80);
        assert_eq!(derive_autofit_width("h", [c_long.as_str()], &options), 50.0);
        assert_eq!(derive_group_sheet_column(0), 0);
        assert_eq!(derive_group_sheet_column(2), 3);
    }

    #[test]
    fn output_file_name_uses_twelve_hour_clock() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
            .and_utc();
        assert_eq!(
            derive_output_file_name("SMW Bulk Shipments", &now),
            "SMW Bulk Shipments 2025-03-07 02-05-09 PM.xlsx"
        );

        let options = SpecReportWriteOptions::default();
        let c_name = derive_output_file_name_now(&options).unwrap();
        assert!(c_name.starts_with("SMW Bulk Shipments "));
        assert!(c_name.ends_with(".xlsx"));

        let options_bad = SpecReportWriteOptions {
            file_name_timezone: "Mars/Olympus".to_string(),
            ..SpecReportWriteOptions::default()
        };
        assert!(matches!(
            derive_output_file_name_now(&options_bad),
            Err(XlsxIoError::InvalidOption(_))
        ));
    }
}
