//! Workbook serialization — pass two of the emitter.
//!
//! Walks the materialized [`WorkbookPlan`] and writes one worksheet per
//! channel plus the cross-channel summary and KPI sheets. Styling is keyed
//! only by row kind and column index.

use std::path::Path;
use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{Workbook as XlsxWorkbook, Worksheet};

use spotplan_engine::dategrid::DateGrid;
use spotplan_engine::model::FinalPlanReport;

use crate::error::ExportError;
use crate::layout::{
    build_workbook_plan, CellSpec, EmitMode, PlanRow, Section, SheetPlan, COLUMN_TITLES,
    FIRST_DATE_COL,
};
use crate::styles;

/// Statistics returned by a successful emit.
#[derive(Debug, Default)]
pub struct EmitResult {
    pub sheets_exported: usize,
    pub cells_exported: usize,
    pub formulas_exported: usize,
    pub export_duration_ms: u128,
    pub warnings: Vec<String>,
}

impl EmitResult {
    /// Returns a summary message suitable for display
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!(
                "{} sheet{}",
                self.sheets_exported,
                if self.sheets_exported == 1 { "" } else { "s" }
            ),
            format!("{} cells", self.cells_exported),
        ];
        if self.formulas_exported > 0 {
            parts.push(format!("{} formulas", self.formulas_exported));
        }
        parts.join(", ")
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

fn xe(e: rust_xlsxwriter::XlsxError) -> ExportError {
    ExportError::Workbook(e.to_string())
}

/// Artifact naming convention:
/// `<BaseName>[_<Client>]_<FromDate>_to_<ToDate>.xlsx`.
pub fn workbook_filename(mode: EmitMode, client: &str, from: NaiveDate, to: NaiveDate) -> String {
    let base = match mode {
        EmitMode::Formulas => "Final_Plan_By_Channel_With_Formulas",
        EmitMode::Values => "Final_Plan_By_Channel",
    };
    let client_part = if client.trim().is_empty() {
        String::new()
    } else {
        format!("_{}", client.trim())
    };
    format!("{base}{client_part}_{from}_to_{to}.xlsx")
}

/// Serialize the report to an XLSX file at `path`.
///
/// Pure pull from the aggregated report: a failure here leaves the report
/// untouched and the export can simply be retried.
pub fn emit(
    report: &FinalPlanReport,
    mode: EmitMode,
    path: &Path,
) -> Result<EmitResult, ExportError> {
    let start_time = Instant::now();
    let mut result = EmitResult::default();

    let plan = build_workbook_plan(report)?;

    let mut workbook = XlsxWorkbook::new();
    for sheet_plan in &plan.sheets {
        let worksheet = workbook.add_worksheet();
        write_channel_sheet(worksheet, sheet_plan, &plan.grid, mode, &mut result)?;
        result.sheets_exported += 1;
    }

    write_summary_sheet(workbook.add_worksheet(), report, &mut result)?;
    write_kpi_sheet(workbook.add_worksheet(), report, &mut result)?;
    result.sheets_exported += 2;

    workbook.save(path).map_err(xe)?;

    result.export_duration_ms = start_time.elapsed().as_millis();
    Ok(result)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    spec: &CellSpec,
    format: &rust_xlsxwriter::Format,
    result: &mut EmitResult,
) -> Result<(), ExportError> {
    match spec {
        CellSpec::Blank => {
            worksheet.write_blank(row, col, format).map_err(xe)?;
        }
        CellSpec::Text(s) => {
            worksheet.write_string_with_format(row, col, s, format).map_err(xe)?;
            result.cells_exported += 1;
        }
        CellSpec::Num(n) => {
            worksheet.write_number_with_format(row, col, *n, format).map_err(xe)?;
            result.cells_exported += 1;
        }
        CellSpec::Formula(f) => {
            worksheet
                .write_formula_with_format(row, col, f.as_str(), format)
                .map_err(xe)?;
            result.cells_exported += 1;
            result.formulas_exported += 1;
        }
    }
    Ok(())
}

/// Dotted date-area cells with weekend shading, for one table row.
fn write_date_area(
    worksheet: &mut Worksheet,
    row: u32,
    grid: &DateGrid,
) -> Result<(), ExportError> {
    let plain = styles::date_area();
    let weekend = styles::date_area_weekend();
    for col in 0..grid.len() {
        let format = if grid.is_weekend(col) { &weekend } else { &plain };
        worksheet
            .write_blank(row, FIRST_DATE_COL + col as u16, format)
            .map_err(xe)?;
    }
    Ok(())
}

fn write_channel_sheet(
    worksheet: &mut Worksheet,
    sheet: &SheetPlan,
    grid: &DateGrid,
    mode: EmitMode,
    result: &mut EmitResult,
) -> Result<(), ExportError> {
    let name: String = sheet.channel.chars().take(31).collect();
    worksheet.set_name(&name).map_err(xe)?;
    worksheet.set_screen_gridlines(false);

    let last_col = FIRST_DATE_COL + grid.len() as u16 - 1;

    for (idx, row) in sheet.rows.iter().enumerate() {
        let r = idx as u32;
        match row {
            PlanRow::Meta { label, value } => {
                worksheet
                    .write_string_with_format(r, 1, label, &styles::meta_label())
                    .map_err(xe)?;
                worksheet
                    .write_string_with_format(r, 2, value, &styles::meta_value())
                    .map_err(xe)?;
                result.cells_exported += 2;
            }
            PlanRow::Blank => {
                if idx > sheet.column_header_row && idx < sheet.total_row {
                    write_date_area(worksheet, r, grid)?;
                }
            }
            PlanRow::MonthHeader => {
                let format = styles::month_header();
                for group in &grid.month_groups {
                    let first = FIRST_DATE_COL + group.start_col as u16;
                    let last = FIRST_DATE_COL + group.end_col as u16;
                    if first == last {
                        worksheet
                            .write_string_with_format(r, first, &group.label, &format)
                            .map_err(xe)?;
                    } else {
                        worksheet
                            .merge_range(r, first, r, last, &group.label, &format)
                            .map_err(xe)?;
                    }
                    result.cells_exported += 1;
                }
            }
            PlanRow::WeekdayHeader => {
                worksheet.set_row_height(r, 40).map_err(xe)?;
                let format = styles::weekday_header();
                for (col, date) in grid.columns.iter().enumerate() {
                    let day = date.format("%a").to_string();
                    worksheet
                        .write_string_with_format(r, FIRST_DATE_COL + col as u16, &day, &format)
                        .map_err(xe)?;
                    result.cells_exported += 1;
                }
            }
            PlanRow::DayHeader => {
                let format = styles::day_header();
                for (col, date) in grid.columns.iter().enumerate() {
                    worksheet
                        .write_number_with_format(
                            r,
                            FIRST_DATE_COL + col as u16,
                            date.day() as f64,
                            &format,
                        )
                        .map_err(xe)?;
                    result.cells_exported += 1;
                }
            }
            PlanRow::ColumnHeader => {
                let format = styles::column_header();
                for (col, title) in COLUMN_TITLES.iter().enumerate() {
                    worksheet
                        .write_string_with_format(r, col as u16, *title, &format)
                        .map_err(xe)?;
                    result.cells_exported += 1;
                }
                write_date_area(worksheet, r, grid)?;
            }
            PlanRow::Section { title } => {
                let format = styles::section_header();
                worksheet
                    .write_string_with_format(r, 0, title, &format)
                    .map_err(xe)?;
                result.cells_exported += 1;
                for col in 1..=last_col {
                    worksheet.write_blank(r, col, &format).map_err(xe)?;
                }
            }
            PlanRow::Data(data) => {
                let format = if data.section == Section::Bonus {
                    styles::bonus_cell()
                } else {
                    styles::data_cell()
                };
                for (col, spec) in data.cells(mode, r + 1).iter().enumerate() {
                    write_cell(worksheet, r, col as u16, spec, &format, result)?;
                }
                write_date_area(worksheet, r, grid)?;
            }
            PlanRow::Placeholder { text } => {
                worksheet
                    .write_string_with_format(r, 0, text, &styles::data_cell())
                    .map_err(xe)?;
                result.cells_exported += 1;
                write_date_area(worksheet, r, grid)?;
            }
            PlanRow::Total(total) => {
                let format = styles::total_cell();
                let cells = total.cells(
                    mode,
                    r + 1,
                    sheet.sum_start as u32 + 1,
                    sheet.sum_end as u32 + 1,
                );
                for (col, spec) in cells.iter().enumerate() {
                    write_cell(worksheet, r, col as u16, spec, &format, result)?;
                }
            }
        }
    }

    worksheet.set_column_width(0, 25.0).map_err(xe)?;
    worksheet.set_column_width(1, 15.0).map_err(xe)?;
    worksheet.set_column_width(2, 10.0).map_err(xe)?;
    worksheet.set_column_width(4, 10.0).map_err(xe)?;
    worksheet.set_column_width(5, 10.0).map_err(xe)?;
    for col in 0..grid.len() {
        worksheet
            .set_column_width(FIRST_DATE_COL + col as u16, 3.0)
            .map_err(xe)?;
    }

    Ok(())
}

const SUMMARY_HEADERS: [&str; 13] = [
    "Channel",
    "Cost",
    "Property value",
    "Total Cost",
    "Spot Buying GRP",
    "Property GRP",
    "Bonus GRP",
    "Total GRP",
    "Spot Buying NGRP",
    "Property NGRP",
    "Bonus NGRP",
    "Total NGRP",
    "CPRP",
];

/// Cross-channel summary, values only, straight from the aggregation engine.
fn write_summary_sheet(
    worksheet: &mut Worksheet,
    report: &FinalPlanReport,
    result: &mut EmitResult,
) -> Result<(), ExportError> {
    worksheet.set_name("Channel Summary (All-In)").map_err(xe)?;
    worksheet.set_screen_gridlines(false);

    let header = styles::summary_header();
    for (col, title) in SUMMARY_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *title, &header)
            .map_err(xe)?;
        result.cells_exported += 1;
    }

    let text = styles::summary_text();
    let number = styles::summary_number();
    for (i, ch) in report.channels.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet
            .write_string_with_format(r, 0, &ch.channel, &text)
            .map_err(xe)?;
        let values = [
            ch.cost,
            ch.property_value,
            ch.total_cost,
            ch.grp_spot,
            ch.grp_property,
            ch.grp_bonus,
            ch.grp_total,
            ch.ngrp_spot,
            ch.ngrp_property,
            ch.ngrp_bonus,
            ch.ngrp_total,
            ch.cprp,
        ];
        for (col, value) in values.iter().enumerate() {
            worksheet
                .write_number_with_format(r, col as u16 + 1, *value, &number)
                .map_err(xe)?;
        }
        result.cells_exported += values.len() + 1;
    }

    for col in 0..SUMMARY_HEADERS.len() {
        worksheet.set_column_width(col as u16, 13.0).map_err(xe)?;
    }

    Ok(())
}

/// Final KPI sheet, values only.
fn write_kpi_sheet(
    worksheet: &mut Worksheet,
    report: &FinalPlanReport,
    result: &mut EmitResult,
) -> Result<(), ExportError> {
    worksheet.set_name("Final KPIs").map_err(xe)?;
    worksheet.set_screen_gridlines(false);

    let kpis = &report.kpis;
    let rows: [(&str, f64); 10] = [
        ("Total Budget", kpis.total_budget),
        ("Spot Buying GRP", kpis.grp_spot),
        ("Property GRP", kpis.grp_property),
        ("Bonus GRP", kpis.grp_bonus),
        ("Total GRP", kpis.grp_total),
        ("Spot Buying NGRP", kpis.ngrp_spot),
        ("Property NGRP", kpis.ngrp_property),
        ("Bonus NGRP", kpis.ngrp_bonus),
        ("Total NGRP", kpis.ngrp_total),
        ("CPRP", kpis.cprp),
    ];

    let header = styles::summary_header();
    worksheet.write_string_with_format(0, 0, "KPI", &header).map_err(xe)?;
    worksheet.write_string_with_format(0, 1, "Value", &header).map_err(xe)?;
    result.cells_exported += 2;

    let text = styles::summary_text();
    let number = styles::summary_number();
    for (i, (metric, value)) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_string_with_format(r, 0, *metric, &text).map_err(xe)?;
        worksheet.write_number_with_format(r, 1, *value, &number).map_err(xe)?;
        result.cells_exported += 2;
    }

    worksheet.set_column_width(0, 24.0).map_err(xe)?;
    worksheet.set_column_width(1, 20.0).map_err(xe)?;

    Ok(())
}
