//! Full pipeline: raw optimizer JSON → normalize → reconcile → report.

use chrono::NaiveDate;
use serde_json::json;

use spotplan_engine::model::{safe_cprp, Source};
use spotplan_engine::normalize::{normalize_property_row, normalize_spot_rows};
use spotplan_engine::{reconcile, PlanInputs, ReportMeta};

fn meta() -> ReportMeta {
    let mut meta = ReportMeta::new(
        NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
    );
    meta.client = "Acme Foods".into();
    meta.campaign = "New Year Push".into();
    meta
}

fn inputs_from_raw() -> PlanInputs {
    // Main optimizer payload: df_result style rows, 0-based commercials,
    // precomputed totals.
    let spot_raw = vec![
        json!({
            "Channel": "DERANA", "Program": "News 1st", "Day": "Mon",
            "Time": "19:00", "Slot": "A", "Commercial": 0,
            "Cost": 1000, "TVR": 10, "NCost": 1000, "NTVR": 10,
            "Spots": 2, "Total_Cost": 2000, "Total_Rating": 20
        }),
        json!({
            "Channel": "SIRASA", "Program": "Teledrama", "Date": "Tue",
            "Start_Time": "20:30", "Slot": "B", "Commercial": 1,
            "NCost": 750, "NTVR": 6, "Spots": 4,
            "Total_Cost": 3000, "Total_NTVR": 24
        }),
    ];
    // Benefit rows: 1-based commercials, same shape.
    let benefit_raw = vec![json!({
        "Channel": "DERANA", "Program": "News 1st", "Day": "Mon",
        "Time": "19:00", "Slot": "A", "Commercial": "COM_1",
        "Cost": 900, "TVR": 9, "Spots": 1,
        "Total_Cost": 900, "Total_Rating": 9
    })];
    // Bonus rows: free inventory, forced slot B / zero cost.
    let bonus_raw = vec![json!({
        "Channel": "DERANA", "Program": "Midnight Movie", "Day": "Fri",
        "Time": "23:30", "Commercial": 1, "Cost": 400, "TVR": 8, "Spots": 1
    })];

    let property_raw = json!({
        "programName": "Morning Sponsorship", "comName": "COM_1",
        "day": "Wed", "time": "07:00", "pt_npt": "A - PT",
        "budget": 500, "rateCardCost": 700, "duration": 30,
        "tvr": 5, "ntvr": 5, "spots": 1
    });

    PlanInputs {
        spot_rows: normalize_spot_rows(&spot_raw, Source::Spot),
        property_rows: vec![normalize_property_row(&property_raw, "DERANA")],
        benefit_rows: normalize_spot_rows(&benefit_raw, Source::Benefit),
        bonus_rows: normalize_spot_rows(&bonus_raw, Source::Bonus),
    }
}

#[test]
fn report_rolls_up_consistently() {
    let report = reconcile(&inputs_from_raw(), meta());

    // Channels are the union over all sources, sorted.
    assert_eq!(report.channel_names(), vec!["DERANA", "SIRASA"]);

    let derana = &report.channels[0];
    assert_eq!(derana.cost, 2000.0);
    assert_eq!(derana.property_value, 500.0 + 900.0);
    assert_eq!(derana.total_cost, 3400.0);
    assert_eq!(derana.ngrp_spot, 20.0);
    assert_eq!(derana.ngrp_property, 5.0 + 9.0);
    assert_eq!(derana.ngrp_bonus, 8.0);

    let sirasa = &report.channels[1];
    assert_eq!(sirasa.cost, 3000.0);
    assert_eq!(sirasa.ngrp_spot, 24.0);

    // Roll-up consistency: Σ channels == report KPIs.
    let ngrp_sum: f64 = report.channels.iter().map(|c| c.ngrp_total).sum();
    assert_eq!(report.kpis.ngrp_total, ngrp_sum);
    assert_eq!(
        report.kpis.cprp,
        safe_cprp(report.kpis.total_budget, report.kpis.ngrp_total)
    );
}

#[test]
fn zero_based_and_one_based_sources_land_in_the_same_bucket() {
    let report = reconcile(&inputs_from_raw(), meta());
    // Main "Commercial": 0 and benefit "COM_1" and bonus 1 are all COM_1.
    let com1 = report
        .commercials
        .iter()
        .find(|c| c.key.as_str() == "COM_1")
        .expect("COM_1 allocation");
    // The benefit row shares the main row's slot, so it merges: 1 row, 3 spots.
    assert_eq!(com1.rows.len(), 1);
    assert_eq!(com1.rows[0].spots, 3);
    assert_eq!(com1.total_cost, 2900.0);
    assert_eq!(com1.bonus_rows.len(), 1);
    assert_eq!(com1.bonus_rating, 8.0);

    let com2 = report
        .commercials
        .iter()
        .find(|c| c.key.as_str() == "COM_2")
        .expect("COM_2 allocation");
    assert_eq!(com2.total_cost, 3000.0);
    assert!(com2.bonus_rows.is_empty());
}

#[test]
fn report_is_recomputed_not_mutated() {
    let inputs = inputs_from_raw();
    let first = reconcile(&inputs, meta());

    let mut grown = inputs.clone();
    grown.bonus_rows.push(grown.bonus_rows[0].clone());
    let second = reconcile(&grown, meta());

    // The first report is untouched by the second computation.
    assert_eq!(first.channels[0].ngrp_bonus, 8.0);
    assert_eq!(second.channels[0].ngrp_bonus, 16.0);
}

#[test]
fn a_failed_source_simply_contributes_nothing() {
    // Upstream failure means that source's rows never arrive; the other
    // sources still produce a valid, exportable report.
    let mut inputs = inputs_from_raw();
    inputs.bonus_rows.clear();
    inputs.benefit_rows.clear();
    let report = reconcile(&inputs, meta());
    assert_eq!(report.kpis.ngrp_bonus, 0.0);
    assert_eq!(report.channels[0].property_value, 500.0);
    assert!(report.kpis.total_budget > 0.0);
}
