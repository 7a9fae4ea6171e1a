//! Activation-window date grid.
//!
//! One column per calendar day, shared by every channel worksheet so all
//! sheets stay column-aligned. Pure date arithmetic: weekend flags are keyed
//! only by column index, never by row content.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;

use crate::error::PlanError;

/// A run of contiguous columns sharing the same (month, year), for header
/// cell merging. Column indices are 0-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGroup {
    pub start_col: usize,
    pub end_col: usize,
    /// `"<Mon> - <Year>"`, e.g. `"Jan - 2024"`.
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateGrid {
    pub columns: Vec<NaiveDate>,
    pub month_groups: Vec<MonthGroup>,
    pub weekend_cols: BTreeSet<usize>,
}

impl DateGrid {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn is_weekend(&self, col: usize) -> bool {
        self.weekend_cols.contains(&col)
    }
}

fn month_label(date: NaiveDate) -> String {
    format!("{} - {}", date.format("%b"), date.year())
}

/// Build the day-by-day column plan for an activation range, inclusive of
/// both endpoints. Fails before any sheet is built when `to < from`.
pub fn build_date_grid(from: NaiveDate, to: NaiveDate) -> Result<DateGrid, PlanError> {
    if to < from {
        return Err(PlanError::InvalidRange { from, to });
    }

    let mut columns = Vec::new();
    let mut day = from;
    while day <= to {
        columns.push(day);
        day = day
            .checked_add_days(Days::new(1))
            .ok_or(PlanError::InvalidRange { from, to })?;
    }

    let mut month_groups: Vec<MonthGroup> = Vec::new();
    let mut weekend_cols = BTreeSet::new();

    for (col, date) in columns.iter().enumerate() {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            weekend_cols.insert(col);
        }

        match month_groups.last_mut() {
            Some(group)
                if group.label == month_label(*date) =>
            {
                group.end_col = col;
            }
            _ => month_groups.push(MonthGroup {
                start_col: col,
                end_col: col,
                label: month_label(*date),
            }),
        }
    }

    Ok(DateGrid {
        columns,
        month_groups,
        weekend_cols,
    })
}
