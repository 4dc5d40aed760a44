//! Item-code by box quantity pivot.

use std::collections::BTreeSet;

use crate::spec::{SpecBoxedRecord, SpecPivotTable};

impl SpecPivotTable {
    /// Aggregate `quantities` (aligned with `rows`) by item code and box.
    pub fn build(rows: &[SpecBoxedRecord], idx_item_code: usize, quantities: &[i64]) -> Self {
        debug_assert_eq!(rows.len(), quantities.len());

        let mut pivot = SpecPivotTable::default();
        let mut set_item_codes = BTreeSet::new();
        let mut set_boxes = BTreeSet::new();

        for (row, n_qty) in rows.iter().zip(quantities) {
            let c_item_code = row.record.value(idx_item_code).to_string();
            set_item_codes.insert(c_item_code.clone());
            set_boxes.insert(row.n_box);
            let n_cell = pivot.cells.entry((c_item_code, row.n_box)).or_insert(0);
            *n_cell = n_cell.saturating_add(*n_qty);
        }

        pivot.item_codes = set_item_codes.into_iter().collect();
        pivot.boxes = set_boxes.into_iter().collect();
        pivot
    }

    /// Summed quantity of one cell; 0 when the pair never occurs.
    pub fn cell(&self, item_code: &str, n_box: usize) -> i64 {
        self.cells
            .get(&(item_code.to_string(), n_box))
            .copied()
            .unwrap_or(0)
    }

    /// Sum over boxes for one item code, saturating at the `i64` bounds.
    pub fn row_total(&self, item_code: &str) -> i64 {
        self.boxes
            .iter()
            .map(|n_box| self.cell(item_code, *n_box))
            .fold(0, i64::saturating_add)
    }

    /// Sum over item codes for one box.
    pub fn col_total(&self, n_box: usize) -> i64 {
        self.item_codes
            .iter()
            .map(|c_item_code| self.cell(c_item_code, n_box))
            .fold(0, i64::saturating_add)
    }

    /// Sum of all cells.
    pub fn grand_total(&self) -> i64 {
        self.cells.values().copied().fold(0, i64::saturating_add)
    }

    /// Whether the pivot has no rows.
    pub fn is_empty(&self) -> bool {
        self.item_codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecRecord;

    fn row(n_box: usize, item_code: &str) -> SpecBoxedRecord {
        SpecBoxedRecord {
            n_box,
            record: SpecRecord {
                idx_row: 0,
                values: vec![item_code.to_string()],
            },
        }
    }

    #[test]
    fn pivot_sums_and_totals_agree() {
        let l_rows = vec![
            row(2, "UPC-B"),
            row(1, "UPC-A"),
            row(10, "UPC-A"),
            row(1, "UPC-A"),
            row(2, "UPC-A"),
        ];
        let l_qty = vec![5, 3, 4, 2, 0];
        let pivot = SpecPivotTable::build(&l_rows, 0, &l_qty);

        assert_eq!(pivot.item_codes, vec!["UPC-A", "UPC-B"]);
        assert_eq!(pivot.boxes, vec![1, 2, 10]);
        assert_eq!(pivot.cell("UPC-A", 1), 5);
        assert_eq!(pivot.cell("UPC-A", 2), 0);
        assert!(pivot.cells.contains_key(&("UPC-A".to_string(), 2)));
        assert_eq!(pivot.cell("UPC-B", 1), 0);
        assert_eq!(pivot.row_total("UPC-A"), 9);
        assert_eq!(pivot.row_total("UPC-B"), 5);
        assert_eq!(pivot.col_total(1), 5);
        assert_eq!(pivot.col_total(2), 5);
        assert_eq!(pivot.col_total(10), 4);
        assert_eq!(pivot.grand_total(), l_qty.iter().sum::<i64>());

        let n_rows_sum: i64 = pivot.item_codes.iter().map(|c| pivot.row_total(c)).sum();
        assert_eq!(n_rows_sum, pivot.grand_total());
    }

    #[test]
    fn huge_quantities_saturate() {
        let l_rows = vec![row(1, "UPC-A"), row(1, "UPC-A"), row(2, "UPC-A"), row(2, "UPC-B")];
        let l_qty = vec![i64::MAX, 1, 7, i64::MIN];
        let pivot = SpecPivotTable::build(&l_rows, 0, &l_qty);

        assert_eq!(pivot.cell("UPC-A", 1), i64::MAX);
        assert_eq!(pivot.row_total("UPC-A"), i64::MAX);
        assert_eq!(pivot.col_total(2), i64::MIN + 7);
        assert_eq!(pivot.grand_total(), i64::MAX.saturating_add(7).saturating_add(i64::MIN));
    }

    #[test]
    fn empty_pivot() {
        let pivot = SpecPivotTable::build(&[], 0, &[]);
        assert!(pivot.is_empty());
        assert_eq!(pivot.grand_total(), 0);
    }
}
