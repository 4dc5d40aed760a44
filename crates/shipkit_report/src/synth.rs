//! Synthesis pipeline: grouping, PO assignment and per-group views.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::distribute::distribute_workload;
use crate::report::ReportSynthesisBuilder;
use crate::spec::{
    ShipmentReportError, SpecBoxedRecord, SpecCoercionWarning, SpecGroupReport, SpecPivotTable,
    SpecPoSummaryRow, SpecRecord, SpecRecordGroup, SpecResolvedSchema, SpecShipmentReport,
    SpecShipmentTable, SpecSynthesisOptions,
};
use crate::util::{
    assign_box_numbers, canonicalize_po_number, coerce_integer, dedup_canonical_pos,
    derive_record_keys, detect_missing_shipment,
};

////////////////////////////////////////////////////////////////////////////////
// #region Grouping

/// Partition records by group key.
///
/// Groups come out ordered by representative identifier. Inside a group,
/// records are stably sorted by shipment key, so equal keys keep row order.
pub fn group_records(
    records: &[SpecRecord],
    idx_identifier: usize,
    n_len_group_key: usize,
) -> Vec<SpecRecordGroup> {
    let mut dict_groups: BTreeMap<String, (String, Vec<(String, SpecRecord)>)> = BTreeMap::new();

    for record in records {
        let c_identifier = record.value(idx_identifier);
        let keys = derive_record_keys(c_identifier, n_len_group_key);
        dict_groups
            .entry(keys.group_key)
            .or_insert_with(|| (c_identifier.to_string(), Vec::new()))
            .1
            .push((keys.shipment_key, record.clone()));
    }

    let mut l_groups: Vec<SpecRecordGroup> = dict_groups
        .into_iter()
        .map(|(group_key, (identifier_full, mut l_keyed))| {
            l_keyed.sort_by(|a, b| a.0.cmp(&b.0));
            SpecRecordGroup {
                group_key,
                identifier_full,
                records: l_keyed.into_iter().map(|(_, record)| record).collect(),
            }
        })
        .collect();
    l_groups.sort_by(|a, b| {
        a.identifier_full
            .cmp(&b.identifier_full)
            .then_with(|| a.group_key.cmp(&b.group_key))
    });
    l_groups
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region GroupReport

/// Derive box numbers, row order, totals, gap flag and pivot for one group.
///
/// Non-numeric quantities count as 0 and are pushed to `builder` as warnings.
pub fn build_group_report(
    group: SpecRecordGroup,
    schema: &SpecResolvedSchema,
    columns: &[String],
    handler: Option<String>,
    builder: &mut ReportSynthesisBuilder,
) -> SpecGroupReport {
    let l_boxes = assign_box_numbers(&group.records, schema.idx_carton);
    let n_boxes_total = l_boxes.iter().copied().max().unwrap_or(0);

    let idx_po_number = schema.idx_po_number;
    let mut l_rows: Vec<SpecBoxedRecord> = l_boxes
        .into_iter()
        .zip(group.records)
        .map(|(n_box, record)| SpecBoxedRecord { n_box, record })
        .collect();
    l_rows.sort_by(|a, b| {
        a.n_box
            .cmp(&b.n_box)
            .then_with(|| a.record.value(idx_po_number).cmp(b.record.value(idx_po_number)))
    });

    let l_quantities: Vec<i64> = match schema.idx_quantity {
        Some(idx_quantity) => l_rows
            .iter()
            .map(|row| coerce_quantity(&row.record, idx_quantity, columns, builder))
            .collect(),
        None => vec![0; l_rows.len()],
    };
    let n_quantity_total = l_quantities.iter().copied().fold(0, i64::saturating_add);

    let if_has_missing_shipment =
        detect_missing_shipment(l_rows.iter().map(|row| row.record.value(idx_po_number)));

    let pivot = match (schema.idx_item_code, schema.idx_quantity) {
        (Some(idx_item_code), Some(_)) => {
            Some(SpecPivotTable::build(&l_rows, idx_item_code, &l_quantities))
        }
        _ => None,
    };

    let po_canonical = canonicalize_po_number(&group.identifier_full).to_string();
    debug!(
        "group {:?}: po={:?} records={} boxes={} quantity={} missing_shipment={}",
        group.group_key,
        po_canonical,
        l_rows.len(),
        n_boxes_total,
        n_quantity_total,
        if_has_missing_shipment
    );

    SpecGroupReport {
        group_key: group.group_key,
        identifier_full: group.identifier_full,
        po_canonical,
        handler,
        rows: l_rows,
        n_boxes_total,
        n_quantity_total,
        if_has_missing_shipment,
        pivot,
    }
}

fn coerce_quantity(
    record: &SpecRecord,
    idx_quantity: usize,
    columns: &[String],
    builder: &mut ReportSynthesisBuilder,
) -> i64 {
    let c_val = record.value(idx_quantity);
    if let Some(n_val) = coerce_integer(c_val) {
        return n_val;
    }
    if !c_val.trim().is_empty() {
        let warning = SpecCoercionWarning {
            idx_row: record.idx_row,
            column: columns.get(idx_quantity).cloned().unwrap_or_default(),
            value: c_val.to_string(),
        };
        debug!("{warning}");
        builder.add_warning(warning);
    }
    0
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Pipeline

/// Run the full synthesis over one input table.
///
/// Columns and roster are validated before any work, so an `Err` means
/// nothing was produced. An empty table yields an empty report.
pub fn synthesize_report<R: Rng>(
    table: &SpecShipmentTable,
    options: &SpecSynthesisOptions,
    rng: &mut R,
) -> Result<SpecShipmentReport, ShipmentReportError> {
    let schema = options.schema.resolve(&table.columns)?;
    options.roster.validate()?;

    let l_groups = group_records(&table.records, schema.idx_identifier, options.n_len_group_key);
    let (l_pos, n_duplicates) =
        dedup_canonical_pos(l_groups.iter().map(|group| group.identifier_full.as_str()));
    if n_duplicates > 0 {
        warn!("{n_duplicates} group(s) share a canonical PO with an earlier group");
    }

    let l_assignments = distribute_workload(&l_pos, &options.roster, rng)?;
    let dict_handlers: HashMap<&str, &str> = l_assignments
        .iter()
        .map(|a| (a.po_canonical.as_str(), a.handler.as_str()))
        .collect();

    let mut builder = ReportSynthesisBuilder {
        cnt_records: table.height() as u64,
        cnt_groups: l_groups.len() as u64,
        cnt_pos_unique: l_pos.len() as u64,
        cnt_pos_duplicate: n_duplicates as u64,
        ..Default::default()
    };

    let mut l_group_reports: Vec<SpecGroupReport> = l_groups
        .into_iter()
        .map(|group| {
            let handler = dict_handlers
                .get(canonicalize_po_number(&group.identifier_full))
                .map(|c_handler| c_handler.to_string());
            build_group_report(group, &schema, &table.columns, handler, &mut builder)
        })
        .collect();
    l_group_reports.sort_by(|a, b| a.po_canonical.cmp(&b.po_canonical));

    let po_summary = l_assignments
        .into_iter()
        .map(|a| SpecPoSummaryRow {
            po_canonical: a.po_canonical,
            handler: a.handler,
            workflow_link: None,
            issue: None,
        })
        .collect();

    let report = builder.build();
    info!("{report}");

    Ok(SpecShipmentReport {
        columns: table.columns.clone(),
        records: table.records.clone(),
        schema,
        po_summary,
        groups: l_group_reports,
        report,
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::spec::EnumPoStatus;

    fn table() -> SpecShipmentTable {
        let rows = [
            ["C1", "U1", "PO-2024-000123-B", "2"],
            ["C1", "U2", "PO-2024-000123-A", "3"],
            ["C2", "U1", "PO-2024-000123-A", "ten"],
            ["C2", "U2", "PO-2024-000123-D", "1.5"],
            ["C9", "U1", "PO-2024-000555A", "4"],
            ["C8", "U1", "PO-2024-000555", "6"],
            ["C8", "U3", "PO-2024-000555", ""],
        ];
        SpecShipmentTable::new(
            ["Carton", "UPC", "Shipment", "Qty"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            rows.iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        )
    }

    fn synthesize(table: &SpecShipmentTable) -> SpecShipmentReport {
        let mut rng = StdRng::seed_from_u64(42);
        synthesize_report(table, &SpecSynthesisOptions::default(), &mut rng).unwrap()
    }

    #[test]
    fn groups_partition_the_input() {
        let table = table();
        let l_groups = group_records(&table.records, 2, 15);
        assert_eq!(l_groups.len(), 3);

        let mut l_rows: Vec<usize> = l_groups
            .iter()
            .flat_map(|group| group.records.iter().map(|record| record.idx_row))
            .collect();
        l_rows.sort();
        assert_eq!(l_rows, (0..table.height()).collect::<Vec<_>>());

        let group = &l_groups[0];
        assert_eq!(group.group_key, "PO-2024-000123-");
        assert_eq!(group.identifier_full, "PO-2024-000123-B");
        let l_order: Vec<usize> = group.records.iter().map(|record| record.idx_row).collect();
        assert_eq!(l_order, vec![1, 2, 0, 3]);
    }

    #[test]
    fn group_report_boxes_totals_and_gap() {
        let report = synthesize(&table());
        let group = &report.groups[0];
        assert_eq!(group.po_canonical, "PO-2024-000123-");
        assert_eq!(group.n_boxes_total, 2);

        let l_rows: Vec<(usize, usize)> = group
            .rows
            .iter()
            .map(|row| (row.n_box, row.record.idx_row))
            .collect();
        assert_eq!(l_rows, vec![(1, 1), (1, 0), (2, 2), (2, 3)]);
        let n_box_max = group.rows.iter().map(|row| row.n_box).max().unwrap();
        let n_cartons = group
            .rows
            .iter()
            .map(|row| row.record.value(0))
            .collect::<BTreeSet<_>>()
            .len();
        assert_eq!(n_box_max, n_cartons);

        assert_eq!(group.n_quantity_total, 6);
        assert!(group.if_has_missing_shipment);

        let pivot = group.pivot.as_ref().unwrap();
        assert_eq!(pivot.grand_total(), group.n_quantity_total);
        assert_eq!(pivot.cell("U2", 1), 3);
        assert_eq!(pivot.cell("U1", 2), 0);
    }

    #[test]
    fn huge_quantities_saturate_instead_of_overflowing() {
        let table = SpecShipmentTable::new(
            ["Carton", "UPC", "Shipment", "Qty"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            vec![
                vec!["C1".into(), "U1".into(), "PO7A".into(), "9223372036854775807".into()],
                vec!["C1".into(), "U1".into(), "PO7A".into(), "1".into()],
            ],
        );
        let report = synthesize(&table);
        let group = &report.groups[0];
        assert_eq!(group.n_quantity_total, i64::MAX);

        let pivot = group.pivot.as_ref().unwrap();
        assert_eq!(pivot.cell("U1", 1), i64::MAX);
        assert_eq!(pivot.grand_total(), i64::MAX);
    }

    #[test]
    fn duplicate_canonical_pos_share_a_handler() {
        let report = synthesize(&table());
        assert_eq!(report.report.cnt_records, 7);
        assert_eq!(report.report.cnt_groups, 3);
        assert_eq!(report.report.cnt_pos_unique, 2);
        assert_eq!(report.report.cnt_pos_duplicate, 1);
        assert_eq!(report.report.warning_count(), 1);
        assert_eq!(report.report.warnings[0].idx_row, 2);
        assert_eq!(report.report.warnings[0].column, "Qty");

        let l_pos: Vec<&str> = report
            .po_summary
            .iter()
            .map(|row| row.po_canonical.as_str())
            .collect();
        assert_eq!(l_pos, vec!["PO-2024-000123-", "PO-2024-000555"]);
        let set_handlers: BTreeSet<&str> =
            report.po_summary.iter().map(|row| row.handler.as_str()).collect();
        assert_eq!(set_handlers, BTreeSet::from(["JB", "Sunshine"]));

        let l_dup: Vec<&SpecGroupReport> = report
            .groups
            .iter()
            .filter(|group| group.po_canonical == "PO-2024-000555")
            .collect();
        assert_eq!(l_dup.len(), 2);
        assert_eq!(l_dup[0].handler, l_dup[1].handler);
        assert_eq!(
            l_dup[0].handler.as_deref(),
            report.handler_for("PO-2024-000555")
        );
        assert!(l_dup.iter().all(|group| !group.if_has_missing_shipment));
        assert_eq!(l_dup[0].n_quantity_total + l_dup[1].n_quantity_total, 10);
    }

    #[test]
    fn summary_status_tracks_external_inputs() {
        let mut report = synthesize(&table());
        assert!(
            report
                .po_summary
                .iter()
                .all(|row| row.status() == EnumPoStatus::AwaitingUpload)
        );
        assert!(report.set_workflow_link("PO-2024-000555", Some("https://wf.test/555".to_string())));
        assert!(report.set_issue("PO-2024-000123-", Some("short".to_string())));
        assert!(!report.set_issue("missing", Some("x".to_string())));

        assert_eq!(report.po_summary[0].status(), EnumPoStatus::WithIssue);
        assert_eq!(report.po_summary[1].status(), EnumPoStatus::Uploaded);
        report.set_workflow_link("PO-2024-000555", None);
        assert_eq!(report.po_summary[1].status(), EnumPoStatus::AwaitingUpload);
    }

    #[test]
    fn missing_optional_columns_skip_pivot() {
        let table = SpecShipmentTable::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![vec!["1".to_string(), "x".to_string(), "PO9A".to_string()]],
        );
        let report = synthesize(&table);
        assert_eq!(report.groups.len(), 1);
        assert!(report.groups[0].pivot.is_none());
        assert_eq!(report.groups[0].n_quantity_total, 0);
        assert_eq!(report.po_summary[0].po_canonical, "PO9");
        assert_eq!(report.po_summary[0].handler, "Sunshine");
    }

    #[test]
    fn degenerate_inputs() {
        let table = SpecShipmentTable::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![],
        );
        let report = synthesize(&table);
        assert!(report.groups.is_empty());
        assert!(report.po_summary.is_empty());
        assert_eq!(report.report.cnt_records, 0);

        let table_narrow = SpecShipmentTable::new(vec!["a".to_string(), "b".to_string()], vec![]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            synthesize_report(&table_narrow, &SpecSynthesisOptions::default(), &mut rng),
            Err(ShipmentReportError::MissingColumns {
                n_required: 3,
                n_found: 2
            })
        );
    }
}
