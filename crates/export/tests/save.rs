//! Emit-to-disk smoke tests: the saved file opens, carries every expected
//! sheet, and the KPI/summary numbers survive the round trip.

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use serde_json::json;

use spotplan_engine::model::{PlanInputs, Source};
use spotplan_engine::normalize::{normalize_property_row, normalize_spot_rows};
use spotplan_engine::{reconcile, FinalPlanReport, ReportMeta};
use spotplan_export::{emit, EmitMode, ExportError};

fn report() -> FinalPlanReport {
    let spot_raw = vec![json!({
        "Channel": "DERANA", "Program": "News 1st", "Day": "Mon",
        "Time": "19:00", "Slot": "A", "Commercial": 0,
        "Cost": 1000, "TVR": 10, "Spots": 2,
        "Total_Cost": 2000, "Total_Rating": 20
    })];
    let property_raw = json!({
        "programName": "Morning Sponsorship", "comName": "Teaser",
        "day": "Wed", "time": "07:00", "pt_npt": "A - PT",
        "budget": 500, "rateCardCost": 700, "duration": 30,
        "tvr": 5, "ntvr": 5, "spots": 1
    });
    let bonus_raw = vec![json!({
        "Channel": "DERANA", "Program": "Midnight Movie", "Day": "Fri",
        "Time": "23:30", "Commercial": 1, "Cost": 400, "Duration": 45,
        "TVR": 8, "Spots": 1
    })];

    let inputs = PlanInputs {
        spot_rows: normalize_spot_rows(&spot_raw, Source::Spot),
        property_rows: vec![normalize_property_row(&property_raw, "DERANA")],
        benefit_rows: vec![],
        bonus_rows: normalize_spot_rows(&bonus_raw, Source::Bonus),
    };
    let mut meta = ReportMeta::new(
        NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
    );
    meta.client = "Acme Foods".into();
    meta.target_group = "All TG".into();
    reconcile(&inputs, meta)
}

fn float_at(range: &calamine::Range<Data>, row: u32, col: u32) -> f64 {
    match range.get_value((row, col)) {
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        other => panic!("expected number at ({row},{col}), got {other:?}"),
    }
}

#[test]
fn values_workbook_round_trips() {
    let report = report();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.xlsx");

    let result = emit(&report, EmitMode::Values, &path).unwrap();
    assert_eq!(result.sheets_exported, 3); // DERANA + summary + KPIs
    assert_eq!(result.formulas_exported, 0);
    assert!(path.exists());

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    let names = workbook.sheet_names();
    assert_eq!(names, vec!["DERANA", "Channel Summary (All-In)", "Final KPIs"]);

    let kpi = workbook.worksheet_range("Final KPIs").unwrap();
    // Row 1 is the header; Total Budget = 2000 spot + 500 property.
    assert_eq!(float_at(&kpi, 1, 1), 2500.0);
    // Last KPI row is CPRP = 2500 / 33.
    assert!((float_at(&kpi, 10, 1) - 2500.0 / 33.0).abs() < 1e-9);

    let summary = workbook.worksheet_range("Channel Summary (All-In)").unwrap();
    assert_eq!(summary.get_value((1, 0)), Some(&Data::String("DERANA".into())));
    assert_eq!(float_at(&summary, 1, 3), 2500.0); // Total Cost
    assert_eq!(float_at(&summary, 1, 11), 33.0); // Total NGRP
}

#[test]
fn formulas_workbook_saves_and_counts_formulas() {
    let report = report();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan_formulas.xlsx");

    let result = emit(&report, EmitMode::Formulas, &path).unwrap();
    assert!(result.formulas_exported > 0);
    assert!(path.exists());

    // The file is a valid xlsx even with formula cells.
    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names().len(), 3);
    let sheet = workbook.worksheet_range("DERANA").unwrap();
    // Static metadata still reads back.
    assert_eq!(
        sheet.get_value((0, 2)),
        Some(&Data::String("Acme Foods".into()))
    );
}

#[test]
fn placeholder_rows_survive_to_disk() {
    let mut report = report();
    report.property_rows.clear();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.xlsx");
    emit(&report, EmitMode::Values, &path).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    let sheet = workbook.worksheet_range("DERANA").unwrap();
    let found = sheet
        .rows()
        .flatten()
        .any(|c| matches!(c, Data::String(s) if s == "(No property rows)"));
    assert!(found, "placeholder row missing from saved sheet");
}

#[test]
fn invalid_range_writes_no_file() {
    let mut report = report();
    report.meta.to_date = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.xlsx");

    let err = emit(&report, EmitMode::Values, &path).unwrap_err();
    assert!(matches!(err, ExportError::Range(_)));
    assert!(!path.exists(), "no partial workbook on range errors");
}
