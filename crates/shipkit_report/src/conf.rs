//! Shipment report constants and default preset factories.

use crate::spec::{SpecRoster, SpecSchema, SpecSynthesisOptions};

/// Number of identifier characters forming the group key.
pub const N_LEN_GROUP_KEY: usize = 15;
/// Minimum number of input columns.
pub const N_NCOLS_INPUT_MIN: usize = 3;

/// Zero-based position of the shipment identifier column.
pub const N_IDX_COL_IDENTIFIER: usize = 2;
/// Zero-based position of the carton identifier column.
pub const N_IDX_COL_CARTON: usize = 0;
/// Zero-based position of the PO Number display column.
pub const N_IDX_COL_PO_NUMBER: usize = 2;

/// Case-insensitive name fragments identifying the item code column.
pub const TUP_COL_ITEM_CODE_PATTERNS: [&str; 1] = ["upc"];
/// Case-insensitive name fragments identifying the quantity column.
pub const TUP_COL_QUANTITY_PATTERNS: [&str; 2] = ["qty", "quantity"];

/// Default handler roster, in remainder preference order.
pub const TUP_HANDLERS_DEFAULT: [&str; 5] = ["Paulo", "JB", "Stephanie", "Sunshine", "Orville"];
/// Handler that never receives remainder assignments.
pub const C_HANDLER_LOW_PRIORITY_DEFAULT: &str = "Orville";
/// Handler that must appear at least once when there is any PO.
pub const C_HANDLER_REQUIRED_DEFAULT: &str = "Sunshine";

/// Status labels, as written into summary sheets.
pub const C_STATUS_AWAITING_UPLOAD: &str = "AWAITING UPLOAD";
pub const C_STATUS_UPLOADED: &str = "UPLOADED";
pub const C_STATUS_WITH_ISSUE: &str = "WITH ISSUE";

/// Column selector reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumColumnIdentifier {
    /// Select by exact column name.
    Name(String),
    /// Select by zero-based column index.
    Index(usize),
    /// Select the first column whose lowercased name contains any fragment.
    NameContains(Vec<String>),
}

impl EnumColumnIdentifier {
    /// Build a [`EnumColumnIdentifier::NameContains`] from string fragments.
    pub fn name_contains(patterns: &[&str]) -> Self {
        Self::NameContains(patterns.iter().map(|c_pat| c_pat.to_string()).collect())
    }

    /// Resolve against `columns`, returning the zero-based index when found.
    pub fn resolve(&self, columns: &[String]) -> Option<usize> {
        match self {
            Self::Index(n_idx) => (*n_idx < columns.len()).then_some(*n_idx),
            Self::Name(c_name) => columns.iter().position(|c_col| c_col == c_name),
            Self::NameContains(l_patterns) => columns.iter().position(|c_col| {
                let c_col_lower = c_col.to_lowercase();
                l_patterns
                    .iter()
                    .any(|c_pat| c_col_lower.contains(&c_pat.to_lowercase()))
            }),
        }
    }
}

impl std::fmt::Display for EnumColumnIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(c_name) => write!(f, "{c_name:?}"),
            Self::Index(n_idx) => write!(f, "#{n_idx}"),
            Self::NameContains(l_patterns) => write!(f, "name containing {l_patterns:?}"),
        }
    }
}

/// Build the default column schema.
pub fn derive_default_schema() -> SpecSchema {
    SpecSchema {
        col_identifier: EnumColumnIdentifier::Index(N_IDX_COL_IDENTIFIER),
        col_carton: EnumColumnIdentifier::Index(N_IDX_COL_CARTON),
        col_po_number: EnumColumnIdentifier::Index(N_IDX_COL_PO_NUMBER),
        col_item_code: Some(EnumColumnIdentifier::name_contains(
            &TUP_COL_ITEM_CODE_PATTERNS,
        )),
        col_quantity: Some(EnumColumnIdentifier::name_contains(
            &TUP_COL_QUANTITY_PATTERNS,
        )),
    }
}

/// Build the default handler roster.
pub fn derive_default_roster() -> SpecRoster {
    SpecRoster {
        handlers: TUP_HANDLERS_DEFAULT.iter().map(ToString::to_string).collect(),
        handlers_low_priority: vec![C_HANDLER_LOW_PRIORITY_DEFAULT.to_string()],
        handler_required: Some(C_HANDLER_REQUIRED_DEFAULT.to_string()),
    }
}

/// Build default synthesis options.
pub fn derive_default_synthesis_options() -> SpecSynthesisOptions {
    SpecSynthesisOptions::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn name_contains_is_case_insensitive_and_takes_first_match() {
        let columns = cols(&["Carton Num", "Ship Qty", "PO", "Quantity Ordered"]);
        let col_qty = EnumColumnIdentifier::name_contains(&TUP_COL_QUANTITY_PATTERNS);
        assert_eq!(col_qty.resolve(&columns), Some(1));

        let col_upc = EnumColumnIdentifier::name_contains(&["UPC"]);
        assert_eq!(col_upc.resolve(&cols(&["a", "Item upc code"])), Some(1));
        assert_eq!(col_upc.resolve(&columns), None);
    }

    #[test]
    fn index_out_of_range_does_not_resolve() {
        let columns = cols(&["a", "b"]);
        assert_eq!(EnumColumnIdentifier::Index(1).resolve(&columns), Some(1));
        assert_eq!(EnumColumnIdentifier::Index(2).resolve(&columns), None);
        assert_eq!(
            EnumColumnIdentifier::Name("b".to_string()).resolve(&columns),
            Some(1)
        );
    }
}
