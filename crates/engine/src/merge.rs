//! Row identity and benefit-into-main merging.
//!
//! A commercial-benefit placement frequently airs in the exact program slot
//! the main spot-buy already purchased; reporting both rows unmerged would
//! double-count that slot's spots, cost and rating. The merge is additive and
//! never drops a row: a benefit row with no matching main row stands alone.

use std::collections::HashMap;

use crate::model::SpotRow;

/// Structural identity of a broadcast slot: lower-cased join of
/// (channel, program, day, time, slot).
pub fn identity_key(row: &SpotRow) -> String {
    format!(
        "{}||{}||{}||{}||{}",
        row.channel, row.program, row.day, row.time, row.slot
    )
    .to_lowercase()
}

// Prime rows sort before non-prime; sub-slots A1..A5 count as prime.
fn slot_rank(slot: &str) -> u8 {
    if slot.trim().to_uppercase().starts_with('B') {
        1
    } else {
        0
    }
}

/// Merge benefit rows into main rows by identity key.
///
/// Rows sharing a key collapse into one row whose `spots`, `total_cost` and
/// `total_rating` are the group sums; descriptive fields come from the first
/// (main) row. Unmatched benefit rows are appended unchanged. Output is
/// sorted slot "A" before slot "B", ties preserving input order. Inputs are
/// not mutated — callers can hold merged and unmerged views of the same rows.
pub fn merge_rows(main: &[SpotRow], benefit: &[SpotRow]) -> Vec<SpotRow> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&SpotRow>> = HashMap::new();

    for row in main {
        let key = identity_key(row);
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(row);
    }

    let mut standalone: Vec<SpotRow> = Vec::new();
    for row in benefit {
        let key = identity_key(row);
        match groups.get_mut(&key) {
            Some(group) => group.push(row),
            None => standalone.push(row.clone()),
        }
    }

    let mut out: Vec<SpotRow> = Vec::with_capacity(order.len() + standalone.len());
    for key in &order {
        let group = &groups[key];
        if group.len() == 1 {
            out.push(group[0].clone());
        } else {
            let mut merged = group[0].clone();
            merged.spots = group.iter().map(|r| r.spots).sum();
            merged.total_cost = group.iter().map(|r| r.total_cost).sum();
            merged.total_rating = group.iter().map(|r| r.total_rating).sum();
            out.push(merged);
        }
    }
    out.extend(standalone);

    out.sort_by_key(|r| slot_rank(&r.slot));
    out
}

/// How many input rows were folded into an existing row rather than emitted.
pub fn merged_row_count(main: &[SpotRow], benefit: &[SpotRow], merged: &[SpotRow]) -> usize {
    (main.len() + benefit.len()).saturating_sub(merged.len())
}
