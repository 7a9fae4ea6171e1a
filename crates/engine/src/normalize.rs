//! Row normalization.
//!
//! The four result sets name the same concepts differently (`Cost` vs
//! `NCost`, `Day` vs `Date`, five spellings of the commercial column). Every
//! alias is resolved here, once, into the fixed-shape [`SpotRow`] /
//! [`PropertyProgramRow`] — nothing past this boundary reads a raw field.

use serde_json::Value;

use crate::commercial;
use crate::model::{PropertyProgramRow, Source, SpotRow};

// ---------------------------------------------------------------------------
// Field access
// ---------------------------------------------------------------------------

/// First present, non-null value among the given field names.
fn field<'a>(raw: &'a Value, names: &[&str]) -> Option<&'a Value> {
    for name in names {
        match raw.get(name) {
            Some(Value::Null) | None => continue,
            Some(v) => return Some(v),
        }
    }
    None
}

/// Parse-float-or-zero coercion: numbers pass through, numeric strings are
/// parsed, everything else becomes 0. Never errors.
fn num(v: Option<&Value>) -> f64 {
    match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn text(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn spots_of(v: Option<&Value>) -> u32 {
    num(v).max(0.0) as u32
}

const COMMERCIAL_ALIASES: &[&str] = &["Commercial", "comName", "Com name", "Com Name", "ComName"];

// ---------------------------------------------------------------------------
// Spot / benefit / bonus rows
// ---------------------------------------------------------------------------

/// Normalize one raw optimizer row into a [`SpotRow`].
///
/// Bonus rows are free inventory: `slot` is forced to `"B"` and `total_cost`
/// to 0 — their cost fields only feed GRP/NGRP, never billing.
///
/// `total_rating` prefers a precomputed `Total_Rating`/`Total_NTVR` over
/// `ntvr × spots`; never both, so upstream rounding is not compounded.
pub fn normalize_spot_row(raw: &Value, source: Source) -> SpotRow {
    let unit_cost = num(field(raw, &["Cost", "NCost", "Total_Cost"]));
    let tvr = num(field(raw, &["TVR", "NTVR"]));
    let n_cost = num(field(raw, &["NCost", "Cost"]));
    let ntvr = num(field(raw, &["NTVR", "TVR"]));
    let spots = spots_of(field(raw, &["Spots"]));

    let total_rating = match field(raw, &["Total_Rating", "Total_NTVR"]) {
        Some(v) => num(Some(v)),
        None => ntvr * spots as f64,
    };
    let total_cost = if source == Source::Bonus {
        0.0
    } else {
        num(field(raw, &["Total_Cost", "Cost"]))
    };

    let slot = if source == Source::Bonus {
        "B".to_string()
    } else {
        let s = text(field(raw, &["Slot"]));
        if s.is_empty() { "A".to_string() } else { s }
    };

    let commercial = match field(raw, COMMERCIAL_ALIASES) {
        Some(v) => commercial::resolve_value(v, source.zero_based_commercials()),
        None => commercial::resolve("", source.zero_based_commercials()),
    };

    SpotRow {
        source,
        channel: text(field(raw, &["Channel"])),
        program: text(field(raw, &["Program", "Name of the program"])),
        day: text(field(raw, &["Day", "Date"])),
        time: text(field(raw, &["Time", "Start_Time", "StartTime"])),
        slot,
        commercial,
        duration: num(field(raw, &["Duration", "duration"])),
        unit_cost,
        tvr,
        n_cost,
        ntvr,
        spots,
        total_cost,
        total_rating,
    }
}

pub fn normalize_spot_rows(raw: &[Value], source: Source) -> Vec<SpotRow> {
    raw.iter().map(|r| normalize_spot_row(r, source)).collect()
}

// ---------------------------------------------------------------------------
// Property rows
// ---------------------------------------------------------------------------

/// Normalize one manually entered property placement for `channel`.
///
/// Derivations when a field is absent: `ntvr = tvr/30 × duration`,
/// `n_cost = budget/spots`, `ngrp = ntvr × spots`, `cprp = budget/ngrp`
/// (the divisions 0-guarded).
pub fn normalize_property_row(raw: &Value, channel: &str) -> PropertyProgramRow {
    let budget = num(field(raw, &["budget", "Budget"]));
    let duration = num(field(raw, &["duration", "Duration"]));
    let tvr = num(field(raw, &["tvr", "TVR"]));
    let spots = spots_of(field(raw, &["spots", "Spots"]));

    let ntvr = match field(raw, &["ntvr", "NTVR"]) {
        Some(v) => num(Some(v)),
        None => tvr / 30.0 * duration,
    };
    let n_cost = match field(raw, &["ncost", "NCost"]) {
        Some(v) => num(Some(v)),
        None => {
            if spots > 0 {
                budget / spots as f64
            } else {
                0.0
            }
        }
    };
    let ngrp = match field(raw, &["ngrp", "NGRP"]) {
        Some(v) => num(Some(v)),
        None => ntvr * spots as f64,
    };
    let cprp = match field(raw, &["cprp", "CPRP"]) {
        Some(v) => num(Some(v)),
        None => crate::model::safe_cprp(budget, ngrp),
    };

    PropertyProgramRow {
        channel: channel.to_string(),
        program: text(field(raw, &["programName", "Name of the program"])),
        commercial_name: text(field(raw, COMMERCIAL_ALIASES)),
        language: text(field(raw, &["language", "Language"])),
        day: text(field(raw, &["day", "Day"])),
        time: text(field(raw, &["time", "Time"])),
        slot: text(field(raw, &["pt_npt", "ptnpt", "PT / NPT"])),
        budget,
        rate_card_cost: num(field(raw, &["rateCardCost", "RateCardCost"])),
        duration,
        tvr,
        ntvr,
        n_cost,
        spots,
        ngrp,
        cprp,
    }
}
