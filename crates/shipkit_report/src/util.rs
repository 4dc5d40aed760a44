//! Stateless helpers: keys, PO canonicalization, box numbering, gap detection, status.

use std::collections::{BTreeSet, HashMap};

use crate::spec::{EnumPoStatus, SpecRecord, SpecRecordKeys};

////////////////////////////////////////////////////////////////////////////////
// #region Keys

/// First `n_len` characters of `value` (the whole value when shorter).
pub fn derive_prefix(value: &str, n_len: usize) -> &str {
    match value.char_indices().nth(n_len) {
        Some((n_byte, _)) => &value[..n_byte],
        None => value,
    }
}

/// Derive group and shipment keys from an identifier value.
pub fn derive_record_keys(identifier: &str, n_len_group_key: usize) -> SpecRecordKeys {
    SpecRecordKeys {
        group_key: derive_prefix(identifier, n_len_group_key).to_string(),
        shipment_key: derive_prefix(identifier, n_len_group_key + 1).to_string(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PoCanonicalization

/// Drop one trailing alphabetic character; numeric or empty input is kept as-is.
pub fn canonicalize_po_number(identifier: &str) -> &str {
    match identifier.char_indices().next_back() {
        Some((n_byte, c_last)) if c_last.is_alphabetic() => &identifier[..n_byte],
        _ => identifier,
    }
}

/// Canonicalize identifiers in order, keeping first occurrence of each result.
///
/// Returns the de-duplicated canonical POs and the number of dropped duplicates.
pub fn dedup_canonical_pos<'a>(identifiers: impl IntoIterator<Item = &'a str>) -> (Vec<String>, usize) {
    let mut set_seen = BTreeSet::new();
    let mut l_pos = Vec::new();
    let mut n_duplicates = 0;
    for identifier in identifiers {
        let c_po = canonicalize_po_number(identifier);
        if set_seen.insert(c_po.to_string()) {
            l_pos.push(c_po.to_string());
        } else {
            n_duplicates += 1;
        }
    }
    (l_pos, n_duplicates)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BoxNumbering

/// Number cartons `1..=K` in order of first appearance within `records`.
///
/// The output is aligned with `records`.
pub fn assign_box_numbers(records: &[SpecRecord], idx_carton: usize) -> Vec<usize> {
    let mut dict_carton_to_box: HashMap<&str, usize> = HashMap::new();
    records
        .iter()
        .map(|record| {
            let n_next = dict_carton_to_box.len() + 1;
            *dict_carton_to_box
                .entry(record.value(idx_carton))
                .or_insert(n_next)
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SequenceGaps

/// Whether the trailing shipment letters start at `A` and then skip a letter.
///
/// Identifiers not ending in a letter are ignored. Sets whose lowest letter is
/// not `A` are never flagged.
pub fn detect_missing_shipment<'a>(identifiers: impl IntoIterator<Item = &'a str>) -> bool {
    let set_letters: BTreeSet<char> = identifiers
        .into_iter()
        .filter_map(|identifier| identifier.chars().next_back())
        .filter(|c_last| c_last.is_alphabetic())
        .filter_map(|c_last| c_last.to_uppercase().next())
        .collect();

    if set_letters.first() != Some(&'A') {
        return false;
    }

    let l_letters: Vec<char> = set_letters.into_iter().collect();
    l_letters
        .windows(2)
        .any(|pair| (pair[1] as u32) - (pair[0] as u32) > 1)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StatusAndCoercion

/// Map link/issue presence to a workflow status.
pub fn derive_status(if_link_present: bool, if_issue_present: bool) -> EnumPoStatus {
    match (if_link_present, if_issue_present) {
        (false, false) => EnumPoStatus::AwaitingUpload,
        (_, true) => EnumPoStatus::WithIssue,
        (true, false) => EnumPoStatus::Uploaded,
    }
}

/// Coerce text to an integer; fractional values truncate toward zero.
///
/// Returns `None` for blank text and for anything not finite-numeric.
pub fn coerce_integer(value: &str) -> Option<i64> {
    let c_val = value.trim();
    if c_val.is_empty() {
        return None;
    }
    if let Ok(n_val) = c_val.parse::<i64>() {
        return Some(n_val);
    }
    match c_val.parse::<f64>() {
        Ok(n_val) if n_val.is_finite() => Some(n_val.trunc() as i64),
        _ => None,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
