//! Sheet layout — pass one of the emitter.
//!
//! Materializes every worksheet as typed rows with final indices before a
//! single cell is written. Formula strings are generated afterwards from
//! those fixed indices, so a formula can never drift against the row it
//! lands in.

use spotplan_engine::dategrid::DateGrid;
use spotplan_engine::model::{safe_cprp, FinalPlanReport, PropertyProgramRow, SpotRow};
use spotplan_engine::{build_date_grid, ReportMeta};

use crate::error::ExportError;

/// Number of fixed data columns (A..R); date columns start right after.
pub const DATA_COLS: u16 = 18;
pub const FIRST_DATE_COL: u16 = DATA_COLS;

pub const COLUMN_TITLES: [&str; DATA_COLS as usize] = [
    "Program",
    "Commercial name",
    "Duration",
    "Language",
    "Day",
    "Time",
    "A - PT/B - NPT",
    "Rate Card Value",
    "Negotiated Value",
    "Rate Card Total",
    "Total Budget",
    "Total Saving",
    "TVR",
    "NTVR",
    "GRP",
    "NGRP",
    "CPRP",
    "Spots",
];

// Column letters for the derived-cell formulas, fixed by the table layout.
const COL_NRATE: char = 'H';
const COL_NCOST: char = 'I';
const COL_RATE_CARD_TOTAL: char = 'J';
const COL_TOTAL_BUDGET: char = 'K';
const COL_TOTAL_SAVING: char = 'L';
const COL_TVR: char = 'M';
const COL_NTVR: char = 'N';
const COL_GRP: char = 'O';
const COL_NGRP: char = 'P';
const COL_SPOTS: char = 'R';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitMode {
    /// Every derived cell is the precomputed number.
    Values,
    /// Derived cells are spreadsheet formulas over sibling cells, so the
    /// file stays self-auditable when a consumer edits raw inputs.
    Formulas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Property,
    Commercial,
    Bonus,
}

/// One emitted cell. What the writer puts in the worksheet, and what the
/// equivalence tests evaluate.
#[derive(Debug, Clone, PartialEq)]
pub enum CellSpec {
    Blank,
    Text(String),
    Num(f64),
    Formula(String),
}

// ---------------------------------------------------------------------------
// Data rows
// ---------------------------------------------------------------------------

/// A fully derived 18-column table row. Unit columns (NCost, NTVR) are
/// re-derived from the row's totals where spots allow, so the `unit × spots`
/// formulas reproduce the totals exactly even for merged rows.
#[derive(Debug, Clone)]
pub struct DataRow {
    pub section: Section,
    pub program: String,
    pub com_name: String,
    pub duration: f64,
    pub language: String,
    pub day: String,
    pub time: String,
    pub slot: String,
    pub nrate: f64,
    pub n_cost: f64,
    pub rate_card_total: f64,
    pub total_budget: f64,
    pub total_saving: f64,
    pub tvr: f64,
    pub ntvr: f64,
    pub grp: f64,
    pub ngrp: f64,
    pub cprp: f64,
    pub spots: u32,
    /// Total Budget is itself `NCost × Spots` (commercial rows). Property
    /// budgets and bonus zeros stay literal in both modes.
    budget_formula: bool,
}

impl DataRow {
    pub fn property(row: &PropertyProgramRow) -> DataRow {
        let spots_f = row.spots as f64;
        let ntvr = if row.spots > 0 { row.ngrp / spots_f } else { row.ntvr };
        let rate_card_total = row.rate_card_total();
        DataRow {
            section: Section::Property,
            program: row.program.clone(),
            com_name: row.commercial_name.clone(),
            duration: row.duration,
            language: row.language.clone(),
            day: row.day.clone(),
            time: row.time.clone(),
            slot: row.slot.clone(),
            nrate: row.rate_card_cost,
            n_cost: 0.0,
            rate_card_total,
            total_budget: row.budget,
            total_saving: rate_card_total - row.budget,
            tvr: row.tvr,
            ntvr,
            grp: row.grp(),
            ngrp: row.ngrp,
            cprp: safe_cprp(row.budget, row.ngrp),
            spots: row.spots,
            budget_formula: false,
        }
    }

    pub fn commercial(row: &SpotRow, duration: f64, com_name: &str, language: &str) -> DataRow {
        let spots_f = row.spots as f64;
        let nrate = row.unit_cost / 30.0 * duration;
        let n_cost = if row.spots > 0 { row.total_cost / spots_f } else { row.n_cost };
        let ntvr = if row.spots > 0 { row.total_rating / spots_f } else { row.ntvr };
        let rate_card_total = nrate * spots_f;
        DataRow {
            section: Section::Commercial,
            program: row.program.clone(),
            com_name: com_name.to_string(),
            duration,
            language: language.to_string(),
            day: row.day.clone(),
            time: row.time.clone(),
            slot: row.slot.clone(),
            nrate,
            n_cost,
            rate_card_total,
            total_budget: row.total_cost,
            total_saving: rate_card_total - row.total_cost,
            tvr: row.tvr,
            ntvr,
            grp: row.tvr * spots_f,
            ngrp: row.total_rating,
            cprp: safe_cprp(row.total_cost, row.total_rating),
            spots: row.spots,
            budget_formula: row.spots > 0,
        }
    }

    pub fn bonus(row: &SpotRow, com_name: &str, language: &str) -> DataRow {
        let spots_f = row.spots as f64;
        let nrate = row.unit_cost / 30.0 * row.duration;
        let ntvr = if row.spots > 0 { row.total_rating / spots_f } else { row.ntvr };
        let rate_card_total = nrate * spots_f;
        DataRow {
            section: Section::Bonus,
            program: row.program.clone(),
            com_name: com_name.to_string(),
            duration: row.duration,
            language: language.to_string(),
            day: row.day.clone(),
            time: row.time.clone(),
            slot: "B".to_string(),
            nrate,
            n_cost: 0.0,
            rate_card_total,
            // Bonus is unpaid inventory: nothing billed, full saving.
            total_budget: 0.0,
            total_saving: rate_card_total,
            tvr: row.tvr,
            ntvr,
            grp: row.tvr * spots_f,
            ngrp: row.total_rating,
            cprp: 0.0,
            spots: row.spots,
            budget_formula: false,
        }
    }

    /// Zero-spot rows keep literal values in both modes: `unit × spots`
    /// formulas cannot reproduce their totals.
    fn formulas_apply(&self, mode: EmitMode) -> bool {
        mode == EmitMode::Formulas && self.spots > 0
    }

    /// The 18 emitted cells for this row. `row_num` is the 1-based worksheet
    /// row this data row lands on.
    pub fn cells(&self, mode: EmitMode, row_num: u32) -> Vec<CellSpec> {
        let mut cells = vec![
            CellSpec::Text(self.program.clone()),
            CellSpec::Text(self.com_name.clone()),
            CellSpec::Num(self.duration),
            CellSpec::Text(self.language.clone()),
            CellSpec::Text(self.day.clone()),
            CellSpec::Text(self.time.clone()),
            CellSpec::Text(self.slot.clone()),
            CellSpec::Num(self.nrate),
            CellSpec::Num(self.n_cost),
        ];

        if self.formulas_apply(mode) {
            let r = row_num;
            cells.push(CellSpec::Formula(format!("{COL_NRATE}{r}*{COL_SPOTS}{r}")));
            cells.push(if self.budget_formula {
                CellSpec::Formula(format!("{COL_NCOST}{r}*{COL_SPOTS}{r}"))
            } else {
                CellSpec::Num(self.total_budget)
            });
            cells.push(CellSpec::Formula(format!(
                "{COL_RATE_CARD_TOTAL}{r}-{COL_TOTAL_BUDGET}{r}"
            )));
            cells.push(CellSpec::Num(self.tvr));
            cells.push(CellSpec::Num(self.ntvr));
            cells.push(CellSpec::Formula(format!("{COL_TVR}{r}*{COL_SPOTS}{r}")));
            cells.push(CellSpec::Formula(format!("{COL_NTVR}{r}*{COL_SPOTS}{r}")));
            cells.push(CellSpec::Formula(format!(
                "IFERROR({COL_TOTAL_BUDGET}{r}/{COL_NGRP}{r},0)"
            )));
            cells.push(CellSpec::Num(self.spots as f64));
        } else {
            cells.push(CellSpec::Num(self.rate_card_total));
            cells.push(CellSpec::Num(self.total_budget));
            cells.push(CellSpec::Num(self.total_saving));
            cells.push(CellSpec::Num(self.tvr));
            cells.push(CellSpec::Num(self.ntvr));
            cells.push(CellSpec::Num(self.grp));
            cells.push(CellSpec::Num(self.ngrp));
            cells.push(CellSpec::Num(self.cprp));
            cells.push(CellSpec::Num(self.spots as f64));
        }

        cells
    }
}

// ---------------------------------------------------------------------------
// Total row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TotalRow {
    pub rate_card_total: f64,
    pub total_budget: f64,
    pub total_saving: f64,
    pub grp: f64,
    pub ngrp: f64,
    pub cprp: f64,
    pub spots: u32,
}

impl TotalRow {
    fn from_rows<'a>(rows: impl Iterator<Item = &'a DataRow>) -> TotalRow {
        let mut total = TotalRow::default();
        for row in rows {
            total.rate_card_total += row.rate_card_total;
            total.total_budget += row.total_budget;
            total.total_saving += row.total_saving;
            total.grp += row.grp;
            total.ngrp += row.ngrp;
            total.spots += row.spots;
        }
        total.cprp = safe_cprp(total.total_budget, total.ngrp);
        total
    }

    /// `row_num` is the total row's own 1-based index; `sum_start..=sum_end`
    /// is the 1-based range the SUMs cover (text rows inside it are inert).
    pub fn cells(&self, mode: EmitMode, row_num: u32, sum_start: u32, sum_end: u32) -> Vec<CellSpec> {
        let mut cells = vec![CellSpec::Text("Total".to_string())];
        cells.extend(std::iter::repeat(CellSpec::Blank).take(8));

        match mode {
            EmitMode::Formulas => {
                let sum = |col: char| {
                    CellSpec::Formula(format!("SUM({col}{sum_start}:{col}{sum_end})"))
                };
                cells.push(sum(COL_RATE_CARD_TOTAL));
                cells.push(sum(COL_TOTAL_BUDGET));
                cells.push(sum(COL_TOTAL_SAVING));
                cells.push(CellSpec::Blank);
                cells.push(CellSpec::Blank);
                cells.push(sum(COL_GRP));
                cells.push(sum(COL_NGRP));
                cells.push(CellSpec::Formula(format!(
                    "IFERROR({COL_TOTAL_BUDGET}{row_num}/{COL_NGRP}{row_num},0)"
                )));
                cells.push(sum(COL_SPOTS));
            }
            EmitMode::Values => {
                cells.push(CellSpec::Num(self.rate_card_total));
                cells.push(CellSpec::Num(self.total_budget));
                cells.push(CellSpec::Num(self.total_saving));
                cells.push(CellSpec::Blank);
                cells.push(CellSpec::Blank);
                cells.push(CellSpec::Num(self.grp));
                cells.push(CellSpec::Num(self.ngrp));
                cells.push(CellSpec::Num(self.cprp));
                cells.push(CellSpec::Num(self.spots as f64));
            }
        }

        cells
    }
}

// ---------------------------------------------------------------------------
// Sheet plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum PlanRow {
    Meta { label: String, value: String },
    Blank,
    MonthHeader,
    WeekdayHeader,
    DayHeader,
    ColumnHeader,
    Section { title: String },
    Data(DataRow),
    Placeholder { text: String },
    Total(TotalRow),
}

/// One channel worksheet, fully materialized. All indices are 0-based into
/// `rows` (the worksheet row is the same index; formulas add 1).
#[derive(Debug, Clone)]
pub struct SheetPlan {
    pub channel: String,
    pub rows: Vec<PlanRow>,
    pub month_row: usize,
    pub weekday_row: usize,
    pub day_row: usize,
    pub column_header_row: usize,
    /// First row the section SUMs cover (just after "Property Benefits").
    pub sum_start: usize,
    /// Last row before the total row.
    pub sum_end: usize,
    pub total_row: usize,
}

impl SheetPlan {
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &DataRow)> + '_ {
        self.rows.iter().enumerate().filter_map(|(i, r)| match r {
            PlanRow::Data(d) => Some((i, d)),
            _ => None,
        })
    }

    pub fn total(&self) -> &TotalRow {
        match &self.rows[self.total_row] {
            PlanRow::Total(t) => t,
            _ => unreachable!("total_row index always points at the total row"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkbookPlan {
    pub grid: DateGrid,
    pub sheets: Vec<SheetPlan>,
}

fn meta_block(meta: &ReportMeta) -> Vec<(String, String)> {
    vec![
        ("Client :".into(), meta.client.clone()),
        ("Activity :".into(), meta.activity.clone()),
        ("Brand :".into(), meta.brand.clone()),
        ("Campaign :".into(), meta.campaign.clone()),
        ("Target Group :".into(), meta.target_group.clone()),
        ("TV Budget :".into(), meta.tv_budget.clone()),
        ("Duration :".into(), meta.duration_label.clone()),
        (
            "Activation Period :".into(),
            format!("{}  to  {}", meta.from_date, meta.to_date),
        ),
        ("Ref No :".into(), meta.ref_no.clone()),
    ]
}

fn build_sheet_plan(report: &FinalPlanReport, channel: &str) -> SheetPlan {
    let mut rows: Vec<PlanRow> = Vec::new();

    for (label, value) in meta_block(&report.meta) {
        rows.push(PlanRow::Meta { label, value });
    }
    rows.push(PlanRow::Blank);

    let month_row = rows.len();
    rows.push(PlanRow::MonthHeader);
    let weekday_row = rows.len();
    rows.push(PlanRow::WeekdayHeader);
    let day_row = rows.len();
    rows.push(PlanRow::DayHeader);

    let column_header_row = rows.len();
    rows.push(PlanRow::ColumnHeader);

    rows.push(PlanRow::Section { title: "Property Benefits".into() });
    let sum_start = rows.len();

    let property: Vec<&PropertyProgramRow> = report
        .property_rows
        .iter()
        .filter(|r| r.channel == channel)
        .collect();
    if property.is_empty() {
        rows.push(PlanRow::Placeholder { text: "(No property rows)".into() });
    } else {
        for row in property {
            rows.push(PlanRow::Data(DataRow::property(row)));
        }
    }

    let mut has_commercial_data = false;
    for allocation in &report.commercials {
        let on_channel: Vec<&SpotRow> =
            allocation.rows.iter().filter(|r| r.channel == channel).collect();
        if on_channel.is_empty() {
            continue;
        }
        has_commercial_data = true;
        let duration = report.meta.commercial_duration(&allocation.key);
        rows.push(PlanRow::Blank);
        rows.push(PlanRow::Section { title: allocation.display_name.clone() });
        for row in on_channel {
            rows.push(PlanRow::Data(DataRow::commercial(
                row,
                duration,
                &allocation.display_name,
                &allocation.language,
            )));
        }
    }
    if !has_commercial_data {
        rows.push(PlanRow::Blank);
        rows.push(PlanRow::Section { title: "Commercial Programs".into() });
        rows.push(PlanRow::Placeholder {
            text: "No commercial programs for this channel".into(),
        });
    }

    rows.push(PlanRow::Blank);
    rows.push(PlanRow::Section { title: "Bonus Programs".into() });
    let bonus: Vec<&SpotRow> = report
        .bonus_rows
        .iter()
        .filter(|r| r.channel == channel)
        .collect();
    if bonus.is_empty() {
        rows.push(PlanRow::Placeholder { text: "No bonus programs for this channel".into() });
    } else {
        for row in bonus {
            rows.push(PlanRow::Data(DataRow::bonus(
                row,
                &report.meta.commercial_name(&row.commercial),
                &report.meta.commercial_language(&row.commercial),
            )));
        }
    }

    let sum_end = rows.len() - 1;
    let total = TotalRow::from_rows(rows.iter().filter_map(|r| match r {
        PlanRow::Data(d) => Some(d),
        _ => None,
    }));
    let total_row = rows.len();
    rows.push(PlanRow::Total(total));

    SheetPlan {
        channel: channel.to_string(),
        rows,
        month_row,
        weekday_row,
        day_row,
        column_header_row,
        sum_start,
        sum_end,
        total_row,
    }
}

/// Materialize the whole workbook. The date grid is validated first: an
/// invalid activation range fails here, before any sheet exists.
pub fn build_workbook_plan(report: &FinalPlanReport) -> Result<WorkbookPlan, ExportError> {
    let grid = build_date_grid(report.meta.from_date, report.meta.to_date)?;

    let sheets = report
        .channel_names()
        .iter()
        .filter(|ch| !ch.trim().is_empty())
        .map(|ch| build_sheet_plan(report, ch))
        .collect();

    Ok(WorkbookPlan { grid, sheets })
}
