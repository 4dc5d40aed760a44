//! Workload distribution of canonical POs across a handler roster.
//!
//! Counts are balanced deterministically; only the ordering draws from the
//! caller's random source, so a seeded source gives reproducible runs.

use std::collections::HashMap;
use std::hash::Hash;

use rand::Rng;
use tracing::debug;

use crate::spec::{ShipmentReportError, SpecAssignment, SpecRoster};

/// Unshuffled handler multiset of length `n_total`.
///
/// Everyone gets `n_total / len(roster)`; the remainder cycles through the
/// non-low-priority handlers in roster order. The required handler, when
/// absent, takes over the first slot held by a non-low-priority handler. It is
/// only ever absent when `n_total` is below the roster size, so every handler
/// holds at most one slot and the low-priority count stays at `n_base`.
pub fn plan_handler_counts<R: Rng>(
    n_total: usize,
    roster: &SpecRoster,
    rng: &mut R,
) -> Result<Vec<String>, ShipmentReportError> {
    roster.validate()?;

    let n_handlers = roster.handlers.len();
    let n_base = n_total / n_handlers;
    let n_remainder = n_total % n_handlers;

    let mut l_preferred = roster.handlers_preferred();
    if l_preferred.is_empty() {
        l_preferred = roster.handlers.iter().map(String::as_str).collect();
    }

    let mut l_assignments: Vec<String> = Vec::with_capacity(n_total);
    for c_handler in &roster.handlers {
        l_assignments.extend(std::iter::repeat_n(c_handler.clone(), n_base));
    }
    for n_idx in 0..n_remainder {
        l_assignments.push(l_preferred[n_idx % l_preferred.len()].to_string());
    }
    while l_assignments.len() < n_total {
        let n_pick = rng.random_range(0..l_preferred.len());
        l_assignments.push(l_preferred[n_pick].to_string());
    }

    if n_total > 0
        && let Some(c_required) = &roster.handler_required
        && !l_assignments.contains(c_required)
        && let Some(n_idx) = l_assignments
            .iter()
            .position(|c_handler| !roster.is_low_priority(c_handler))
    {
        debug!(
            "handler {c_required:?} missing from plan, takes slot of {:?}",
            l_assignments[n_idx]
        );
        l_assignments[n_idx] = c_required.clone();
    }

    Ok(l_assignments)
}

/// Assign each canonical PO, in listing order, a handler from a shuffled plan.
pub fn distribute_workload<R: Rng>(
    pos_canonical: &[String],
    roster: &SpecRoster,
    rng: &mut R,
) -> Result<Vec<SpecAssignment>, ShipmentReportError> {
    let n_total = pos_canonical.len();
    let l_plan = plan_handler_counts(n_total, roster, rng)?;
    let mut l_handlers = shuffle_no_consecutive(l_plan, rng);
    l_handlers.truncate(n_total);

    Ok(pos_canonical
        .iter()
        .zip(l_handlers)
        .map(|(c_po, c_handler)| SpecAssignment {
            po_canonical: c_po.clone(),
            handler: c_handler,
        })
        .collect())
}

/// Shuffle while avoiding equal neighbours.
///
/// Each step draws uniformly among remaining items that differ from the last
/// placed item and still leave the rest arrangeable without equal neighbours.
/// This deliberately narrows a plain uniform draw over all differing items:
/// the distribution shifts, but a multiset with no value above `ceil(n/2)`
/// always comes out without collisions.
/// If none keeps the rest arrangeable, any differing item is drawn; if none
/// differs, the first remaining item is forced. A single forward repair pass
/// then swaps later items into each remaining collision where that does not
/// create a new collision around the swapped-out position. The repair is best
/// effort; a multiset dominated by one value keeps some collisions.
pub fn shuffle_no_consecutive<T, R>(items: Vec<T>, rng: &mut R) -> Vec<T>
where
    T: Clone + Eq + Hash,
    R: Rng,
{
    if items.len() <= 1 {
        return items;
    }

    let mut dict_counts: HashMap<T, usize> = HashMap::new();
    for item in &items {
        *dict_counts.entry(item.clone()).or_insert(0) += 1;
    }

    let mut l_remaining = items;
    let mut l_result: Vec<T> = Vec::with_capacity(l_remaining.len());

    while !l_remaining.is_empty() {
        let last = l_result.last();
        let l_idx_differing: Vec<usize> = l_remaining
            .iter()
            .enumerate()
            .filter(|(_, item)| Some(*item) != last)
            .map(|(n_idx, _)| n_idx)
            .collect();
        let l_idx_feasible: Vec<usize> = l_idx_differing
            .iter()
            .copied()
            .filter(|n_idx| is_rest_arrangeable(&dict_counts, &l_remaining[*n_idx], l_remaining.len()))
            .collect();

        let n_idx_chosen = if !l_idx_feasible.is_empty() {
            l_idx_feasible[rng.random_range(0..l_idx_feasible.len())]
        } else if !l_idx_differing.is_empty() {
            l_idx_differing[rng.random_range(0..l_idx_differing.len())]
        } else {
            0
        };

        let item = l_remaining.remove(n_idx_chosen);
        if let Some(n_count) = dict_counts.get_mut(&item) {
            *n_count -= 1;
        }
        l_result.push(item);
    }

    repair_adjacent_duplicates(&mut l_result);
    l_result
}

/// Whether, after drawing `candidate` from `n_remaining` items with `counts`,
/// the rest can be laid out with no equal neighbours and not start with `candidate`.
fn is_rest_arrangeable<T: Eq + Hash>(counts: &HashMap<T, usize>, candidate: &T, n_remaining: usize) -> bool {
    let n_rest = n_remaining - 1;
    let n_slots_max = n_rest.div_ceil(2);
    let n_candidate_rest = counts.get(candidate).copied().unwrap_or(0).saturating_sub(1);

    let n_max_rest = counts
        .iter()
        .map(|(item, n_count)| if item == candidate { n_candidate_rest } else { *n_count })
        .max()
        .unwrap_or(0);

    if n_max_rest > n_slots_max {
        return false;
    }
    !(n_rest % 2 == 1 && n_candidate_rest == n_slots_max)
}

fn repair_adjacent_duplicates<T: PartialEq>(items: &mut [T]) {
    let n_len = items.len();
    for n_idx in 0..n_len.saturating_sub(1) {
        if items[n_idx] != items[n_idx + 1] {
            continue;
        }
        for n_idx_swap in (n_idx + 2)..n_len {
            if items[n_idx_swap] == items[n_idx] {
                continue;
            }
            let if_collides_left =
                n_idx_swap - 1 != n_idx + 1 && items[n_idx_swap - 1] == items[n_idx];
            let if_collides_right = n_idx_swap + 1 < n_len && items[n_idx_swap + 1] == items[n_idx];
            if if_collides_left || if_collides_right {
                continue;
            }
            items.swap(n_idx + 1, n_idx_swap);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn count_of(items: &[String], name: &str) -> usize {
        items.iter().filter(|c_item| *c_item == name).count()
    }

    fn count_adjacent_equal<T: PartialEq>(items: &[T]) -> usize {
        items.windows(2).filter(|pair| pair[0] == pair[1]).count()
    }

    fn pos(n: usize) -> Vec<String> {
        (0..n).map(|n_idx| format!("PO{n_idx:03}")).collect()
    }

    #[test]
    fn seventeen_pos_over_five_handlers() {
        let roster = SpecRoster::default();
        let mut rng = StdRng::seed_from_u64(17);
        let l_assignments = distribute_workload(&pos(17), &roster, &mut rng).unwrap();
        assert_eq!(l_assignments.len(), 17);

        let l_handlers: Vec<String> = l_assignments.iter().map(|a| a.handler.clone()).collect();
        assert_eq!(count_of(&l_handlers, "Orville"), 3);
        for c_handler in ["Paulo", "JB", "Stephanie", "Sunshine"] {
            let n_count = count_of(&l_handlers, c_handler);
            assert!(n_count == 3 || n_count == 4, "{c_handler}: {n_count}");
        }
        assert_eq!(count_of(&l_handlers, "Paulo"), 4);
        assert_eq!(count_of(&l_handlers, "Sunshine"), 3);
        assert_eq!(count_adjacent_equal(&l_handlers), 0);

        for (a, c_po) in l_assignments.iter().zip(pos(17)) {
            assert_eq!(a.po_canonical, c_po);
        }
    }

    #[test]
    fn low_priority_never_gets_remainder() {
        let roster = SpecRoster::default();
        let mut rng = StdRng::seed_from_u64(3);
        for n_total in 0..40 {
            let l_plan = plan_handler_counts(n_total, &roster, &mut rng).unwrap();
            assert_eq!(l_plan.len(), n_total);
            let n_base = n_total / 5;
            assert_eq!(count_of(&l_plan, "Orville"), n_base, "total {n_total}");
            if n_total > 0 {
                assert!(count_of(&l_plan, "Sunshine") >= 1, "total {n_total}");
            }
            let l_counts: Vec<usize> = ["Paulo", "JB", "Stephanie", "Sunshine"]
                .iter()
                .map(|c_handler| count_of(&l_plan, c_handler))
                .collect();
            let n_min = *l_counts.iter().min().unwrap();
            let n_max = *l_counts.iter().max().unwrap();
            assert!(n_max - n_min <= 1, "total {n_total}: {l_counts:?}");
        }
    }

    #[test]
    fn required_handler_takes_first_preferred_slot() {
        let roster = SpecRoster::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            plan_handler_counts(2, &roster, &mut rng).unwrap(),
            vec!["Sunshine".to_string(), "JB".to_string()]
        );
        assert_eq!(
            plan_handler_counts(1, &roster, &mut rng).unwrap(),
            vec!["Sunshine".to_string()]
        );
    }

    #[test]
    fn low_priority_required_handler_is_rejected() {
        let roster = SpecRoster {
            handlers: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            handlers_low_priority: vec!["C".to_string()],
            handler_required: Some("C".to_string()),
        };
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            plan_handler_counts(2, &roster, &mut rng),
            Err(ShipmentReportError::InvalidRoster(_))
        ));

        let roster_ok = SpecRoster {
            handler_required: Some("B".to_string()),
            ..roster
        };
        let l_plan = plan_handler_counts(2, &roster_ok, &mut rng).unwrap();
        assert_eq!(l_plan, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(count_of(&l_plan, "C"), 0);
    }

    #[test]
    fn excluded_handler_variant() {
        let roster = SpecRoster::default().without("Orville");
        let mut rng = StdRng::seed_from_u64(11);
        let l_plan = plan_handler_counts(10, &roster, &mut rng).unwrap();
        assert_eq!(count_of(&l_plan, "Orville"), 0);
        assert_eq!(count_of(&l_plan, "Paulo"), 3);
        assert_eq!(count_of(&l_plan, "JB"), 3);
        assert_eq!(count_of(&l_plan, "Stephanie"), 2);
        assert_eq!(count_of(&l_plan, "Sunshine"), 2);
    }

    #[test]
    fn empty_input_and_invalid_roster() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(
            distribute_workload(&[], &SpecRoster::default(), &mut rng)
                .unwrap()
                .is_empty()
        );
        let roster_empty = SpecRoster {
            handlers: vec![],
            handlers_low_priority: vec![],
            handler_required: None,
        };
        assert!(distribute_workload(&pos(3), &roster_empty, &mut rng).is_err());
    }

    #[test]
    fn same_seed_same_assignment() {
        let roster = SpecRoster::default();
        let l_first = distribute_workload(&pos(23), &roster, &mut StdRng::seed_from_u64(99)).unwrap();
        let l_second = distribute_workload(&pos(23), &roster, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(l_first, l_second);
    }

    #[test]
    fn shuffle_avoids_neighbours_when_feasible() {
        let l_cases: Vec<Vec<u8>> = vec![
            vec![1, 1, 2, 3],
            vec![1, 1, 1, 2, 2],
            vec![1, 1, 1, 2, 2, 3],
            vec![1, 1, 1, 1, 2, 2, 3, 3],
            vec![1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 5],
            vec![7, 7, 7, 7, 7, 8, 8, 8, 8, 9],
        ];
        for n_seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(n_seed);
            for l_items in &l_cases {
                let l_shuffled = shuffle_no_consecutive(l_items.clone(), &mut rng);
                assert_eq!(count_adjacent_equal(&l_shuffled), 0, "{l_shuffled:?}");

                let mut l_sorted = l_shuffled.clone();
                l_sorted.sort();
                let mut l_expected = l_items.clone();
                l_expected.sort();
                assert_eq!(l_sorted, l_expected);
            }
        }
    }

    #[test]
    fn shuffle_dominated_multiset_keeps_counts() {
        let mut rng = StdRng::seed_from_u64(5);
        let l_shuffled = shuffle_no_consecutive(vec![1, 1, 1, 1, 2], &mut rng);
        assert_eq!(l_shuffled.iter().filter(|n| **n == 1).count(), 4);
        assert!(count_adjacent_equal(&l_shuffled) >= 2);

        assert_eq!(shuffle_no_consecutive(vec![4], &mut rng), vec![4]);
        assert!(shuffle_no_consecutive(Vec::<u8>::new(), &mut rng).is_empty());
    }

    #[test]
    fn repair_pass_swaps_forward_without_new_collision() {
        let mut l_items = vec![1, 1, 2, 3];
        repair_adjacent_duplicates(&mut l_items);
        assert_eq!(l_items, vec![1, 2, 1, 3]);

        let mut l_items = vec![2, 3, 1, 1];
        repair_adjacent_duplicates(&mut l_items);
        assert_eq!(l_items, vec![2, 3, 1, 1]);
    }
}
