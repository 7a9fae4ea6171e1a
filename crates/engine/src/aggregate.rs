//! Channel / commercial / KPI roll-ups.
//!
//! Three-level consistency is the contract here: row sums make the channel
//! aggregates, channel sums make the report KPIs, and CPRP is recomputed as
//! `total_cost / ngrp_total` at whatever level it is reported — never summed
//! or averaged across groups.

use std::collections::BTreeMap;

use crate::commercial::CommercialKey;
use crate::merge;
use crate::model::{
    safe_cprp, ChannelAggregate, CommercialAllocation, FinalPlanReport, KpiSet, PlanInputs,
    ReconcileSummary, ReportMeta, SpotRow,
};

#[derive(Default)]
struct ChannelAcc {
    cost: f64,
    property_value: f64,
    grp_spot: f64,
    grp_property: f64,
    grp_bonus: f64,
    ngrp_spot: f64,
    ngrp_property: f64,
    ngrp_bonus: f64,
}

/// Reconcile the four source row sets into one report.
///
/// Spot spend stays `cost`; property budget plus benefit optimizer spend is
/// `property_value` (benefit spend is economically property spend, not spot
/// spend). Bonus rows contribute rating only — their cost is never billed.
pub fn reconcile(inputs: &PlanInputs, meta: ReportMeta) -> FinalPlanReport {
    let mut by_channel: BTreeMap<String, ChannelAcc> = BTreeMap::new();

    for row in &inputs.spot_rows {
        let acc = by_channel.entry(row.channel.clone()).or_default();
        acc.cost += row.total_cost;
        acc.grp_spot += row.grp();
        acc.ngrp_spot += row.total_rating;
    }
    for row in &inputs.property_rows {
        let acc = by_channel.entry(row.channel.clone()).or_default();
        acc.property_value += row.budget;
        acc.grp_property += row.grp();
        acc.ngrp_property += row.ngrp;
    }
    for row in &inputs.benefit_rows {
        let acc = by_channel.entry(row.channel.clone()).or_default();
        acc.property_value += row.total_cost;
        acc.grp_property += row.grp();
        acc.ngrp_property += row.total_rating;
    }
    for row in &inputs.bonus_rows {
        let acc = by_channel.entry(row.channel.clone()).or_default();
        acc.grp_bonus += row.grp();
        acc.ngrp_bonus += row.total_rating;
    }

    let channels: Vec<ChannelAggregate> = by_channel
        .into_iter()
        .map(|(channel, acc)| {
            let total_cost = acc.cost + acc.property_value;
            let grp_total = acc.grp_spot + acc.grp_property + acc.grp_bonus;
            let ngrp_total = acc.ngrp_spot + acc.ngrp_property + acc.ngrp_bonus;
            ChannelAggregate {
                channel,
                cost: acc.cost,
                property_value: acc.property_value,
                total_cost,
                grp_spot: acc.grp_spot,
                grp_property: acc.grp_property,
                grp_bonus: acc.grp_bonus,
                grp_total,
                ngrp_spot: acc.ngrp_spot,
                ngrp_property: acc.ngrp_property,
                ngrp_bonus: acc.ngrp_bonus,
                ngrp_total,
                cprp: safe_cprp(total_cost, ngrp_total),
            }
        })
        .collect();

    let (commercials, merged_rows) = allocate_commercials(inputs, &meta);

    // KPI totals: the channel sums rolled up once more.
    let mut kpis = KpiSet::default();
    for ch in &channels {
        kpis.total_budget += ch.total_cost;
        kpis.grp_spot += ch.grp_spot;
        kpis.grp_property += ch.grp_property;
        kpis.grp_bonus += ch.grp_bonus;
        kpis.grp_total += ch.grp_total;
        kpis.ngrp_spot += ch.ngrp_spot;
        kpis.ngrp_property += ch.ngrp_property;
        kpis.ngrp_bonus += ch.ngrp_bonus;
        kpis.ngrp_total += ch.ngrp_total;
    }
    kpis.cprp = safe_cprp(kpis.total_budget, kpis.ngrp_total);

    let summary = ReconcileSummary {
        spot_rows: inputs.spot_rows.len(),
        property_rows: inputs.property_rows.len(),
        benefit_rows: inputs.benefit_rows.len(),
        bonus_rows: inputs.bonus_rows.len(),
        channels: channels.len(),
        commercials: commercials.len(),
        merged_rows,
    };

    FinalPlanReport {
        meta,
        kpis,
        channels,
        commercials,
        property_rows: inputs.property_rows.clone(),
        bonus_rows: inputs.bonus_rows.clone(),
        summary,
    }
}

/// Group spot + benefit rows per resolved commercial key (billed), with the
/// bonus rows of the same key carried alongside in their own bucket.
fn allocate_commercials(
    inputs: &PlanInputs,
    meta: &ReportMeta,
) -> (Vec<CommercialAllocation>, usize) {
    let mut keys: BTreeMap<CommercialKey, ()> = BTreeMap::new();
    for row in inputs
        .spot_rows
        .iter()
        .chain(&inputs.benefit_rows)
        .chain(&inputs.bonus_rows)
    {
        keys.entry(row.commercial.clone()).or_insert(());
    }

    let rows_of = |rows: &[SpotRow], key: &CommercialKey| -> Vec<SpotRow> {
        rows.iter().filter(|r| &r.commercial == key).cloned().collect()
    };

    let mut merged_total = 0usize;
    let allocations = keys
        .into_keys()
        .map(|key| {
            let main = rows_of(&inputs.spot_rows, &key);
            let benefit = rows_of(&inputs.benefit_rows, &key);
            let rows = merge::merge_rows(&main, &benefit);
            merged_total += merge::merged_row_count(&main, &benefit, &rows);

            let total_cost: f64 = rows.iter().map(|r| r.total_cost).sum();
            let total_rating: f64 = rows.iter().map(|r| r.total_rating).sum();
            let bonus_rows = rows_of(&inputs.bonus_rows, &key);
            let bonus_rating: f64 = bonus_rows.iter().map(|r| r.total_rating).sum();

            CommercialAllocation {
                display_name: meta.commercial_name(&key),
                language: meta.commercial_language(&key),
                rows,
                total_cost,
                total_rating,
                cprp: safe_cprp(total_cost, total_rating),
                bonus_rows,
                bonus_rating,
                key,
            }
        })
        .collect();

    (allocations, merged_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commercial;
    use crate::model::{PropertyProgramRow, Source};
    use chrono::NaiveDate;

    fn meta() -> ReportMeta {
        ReportMeta::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
    }

    fn spot(channel: &str, program: &str, tvr: f64, spots: u32, total_cost: f64) -> SpotRow {
        SpotRow {
            source: Source::Spot,
            channel: channel.into(),
            program: program.into(),
            day: "Mon".into(),
            time: "19:00".into(),
            slot: "A".into(),
            commercial: commercial::resolve("COM_1", false),
            duration: 30.0,
            unit_cost: if spots > 0 { total_cost / spots as f64 } else { 0.0 },
            tvr,
            n_cost: if spots > 0 { total_cost / spots as f64 } else { 0.0 },
            ntvr: tvr,
            spots,
            total_cost,
            total_rating: tvr * spots as f64,
        }
    }

    fn property(channel: &str, budget: f64, tvr: f64, ntvr: f64, spots: u32) -> PropertyProgramRow {
        PropertyProgramRow {
            channel: channel.into(),
            program: "Sponsored Slot".into(),
            commercial_name: "COM_1".into(),
            language: String::new(),
            day: "Tue".into(),
            time: "20:00".into(),
            slot: "A - PT".into(),
            budget,
            rate_card_cost: 0.0,
            duration: 30.0,
            tvr,
            ntvr,
            n_cost: if spots > 0 { budget / spots as f64 } else { 0.0 },
            spots,
            ngrp: ntvr * spots as f64,
            cprp: safe_cprp(budget, ntvr * spots as f64),
        }
    }

    fn bonus(channel: &str, tvr: f64, spots: u32) -> SpotRow {
        let mut row = spot(channel, "Bonus Slot", tvr, spots, 0.0);
        row.source = Source::Bonus;
        row.slot = "B".into();
        row
    }

    // The end-to-end scenario: one spot row (cost=1000/spot, tvr=10, spots=2),
    // one property row (budget=500, tvr=ntvr=5, spots=1), one bonus row
    // (tvr=8, spots=1).
    fn scenario() -> PlanInputs {
        PlanInputs {
            spot_rows: vec![spot("DERANA", "News", 10.0, 2, 2000.0)],
            property_rows: vec![property("DERANA", 500.0, 5.0, 5.0, 1)],
            benefit_rows: vec![],
            bonus_rows: vec![bonus("DERANA", 8.0, 1)],
        }
    }

    #[test]
    fn end_to_end_channel_aggregate() {
        let report = reconcile(&scenario(), meta());
        assert_eq!(report.channels.len(), 1);
        let ch = &report.channels[0];
        assert_eq!(ch.cost, 2000.0);
        assert_eq!(ch.property_value, 500.0);
        assert_eq!(ch.total_cost, 2500.0);
        assert_eq!(ch.ngrp_spot, 20.0);
        assert_eq!(ch.ngrp_property, 5.0);
        assert_eq!(ch.ngrp_bonus, 8.0);
        assert_eq!(ch.ngrp_total, 33.0);
        assert_eq!(ch.cprp, 2500.0 / 33.0);
    }

    #[test]
    fn grp_and_ngrp_conserve_per_channel() {
        let report = reconcile(&scenario(), meta());
        for ch in &report.channels {
            assert_eq!(ch.grp_spot + ch.grp_property + ch.grp_bonus, ch.grp_total);
            assert_eq!(ch.ngrp_spot + ch.ngrp_property + ch.ngrp_bonus, ch.ngrp_total);
        }
    }

    #[test]
    fn kpis_are_channel_sums() {
        let mut inputs = scenario();
        inputs.spot_rows.push(spot("SIRASA", "Drama", 6.0, 3, 4500.0));
        inputs.property_rows.push(property("SIRASA", 800.0, 2.0, 2.0, 2));
        let report = reconcile(&inputs, meta());

        let ngrp_sum: f64 = report.channels.iter().map(|c| c.ngrp_total).sum();
        let budget_sum: f64 = report.channels.iter().map(|c| c.total_cost).sum();
        assert_eq!(report.kpis.ngrp_total, ngrp_sum);
        assert_eq!(report.kpis.total_budget, budget_sum);
        assert_eq!(report.kpis.cprp, safe_cprp(budget_sum, ngrp_sum));
    }

    #[test]
    fn benefit_spend_counts_as_property_value() {
        let mut inputs = scenario();
        let mut benefit = spot("DERANA", "News", 4.0, 1, 900.0);
        benefit.source = Source::Benefit;
        inputs.benefit_rows.push(benefit);
        let report = reconcile(&inputs, meta());
        let ch = &report.channels[0];
        assert_eq!(ch.cost, 2000.0); // spot spend unchanged
        assert_eq!(ch.property_value, 500.0 + 900.0);
        assert_eq!(ch.ngrp_property, 5.0 + 4.0);
    }

    #[test]
    fn bonus_stays_out_of_billed_commercial_totals() {
        let report = reconcile(&scenario(), meta());
        assert_eq!(report.commercials.len(), 1);
        let com = &report.commercials[0];
        assert_eq!(com.key.as_str(), "COM_1");
        assert_eq!(com.total_cost, 2000.0);
        assert_eq!(com.total_rating, 20.0);
        assert_eq!(com.bonus_rows.len(), 1);
        assert_eq!(com.bonus_rating, 8.0);
        assert_eq!(com.cprp, 100.0);
    }

    #[test]
    fn overlapping_benefit_row_merges_into_commercial_rows() {
        let mut inputs = scenario();
        let mut benefit = spot("DERANA", "News", 10.0, 1, 1000.0);
        benefit.source = Source::Benefit;
        inputs.benefit_rows.push(benefit);
        let report = reconcile(&inputs, meta());
        let com = &report.commercials[0];
        // Same slot: one merged row, sums conserved.
        assert_eq!(com.rows.len(), 1);
        assert_eq!(com.rows[0].spots, 3);
        assert_eq!(com.total_cost, 3000.0);
        assert_eq!(report.summary.merged_rows, 1);
    }

    #[test]
    fn property_only_channel_still_appears() {
        let mut inputs = scenario();
        inputs.property_rows.push(property("RUPAVAHINI", 300.0, 1.0, 1.0, 1));
        let report = reconcile(&inputs, meta());
        let names = report.channel_names();
        assert!(names.contains(&"RUPAVAHINI".to_string()));
        let ch = report.channels.iter().find(|c| c.channel == "RUPAVAHINI").unwrap();
        assert_eq!(ch.cost, 0.0);
        assert_eq!(ch.total_cost, 300.0);
    }

    #[test]
    fn empty_inputs_yield_empty_report() {
        let report = reconcile(&PlanInputs::default(), meta());
        assert!(report.channels.is_empty());
        assert!(report.commercials.is_empty());
        assert_eq!(report.kpis.total_budget, 0.0);
        assert_eq!(report.kpis.cprp, 0.0);
    }

    #[test]
    fn commercials_sorted_by_numeric_suffix() {
        let mut inputs = PlanInputs::default();
        for raw in ["COM_10", "COM_2", "COM_1"] {
            let mut row = spot("TV1", raw, 1.0, 1, 100.0);
            row.commercial = commercial::resolve(raw, false);
            row.program = format!("Show {raw}");
            inputs.spot_rows.push(row);
        }
        let report = reconcile(&inputs, meta());
        let keys: Vec<&str> = report.commercials.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["COM_1", "COM_2", "COM_10"]);
    }
}
