use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::commercial::CommercialKey;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Which result set a row came from. Each source is a disjoint slice of the
/// final plan; no row ever moves between sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Spot,
    Property,
    Benefit,
    Bonus,
}

impl Source {
    /// Commercial numbering convention carried by this source's raw rows.
    /// The main optimizer emits 0-based commercial indices; everything else
    /// is 1-based or free text. Pinned here so every resolver call site
    /// states the convention explicitly.
    pub fn zero_based_commercials(self) -> bool {
        matches!(self, Source::Spot)
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spot => write!(f, "spot"),
            Self::Property => write!(f, "property"),
            Self::Benefit => write!(f, "benefit"),
            Self::Bonus => write!(f, "bonus"),
        }
    }
}

/// A single normalized broadcast slot from an optimizer result set.
///
/// `total_cost` / `total_rating` are source guarantees (`unit × spots`),
/// re-derived only when merged rows recompute sums.
#[derive(Debug, Clone, Serialize)]
pub struct SpotRow {
    pub source: Source,
    pub channel: String,
    pub program: String,
    pub day: String,
    pub time: String,
    /// "A" prime / "B" non-prime, or channel sub-slots like "A1".."A5".
    pub slot: String,
    pub commercial: CommercialKey,
    /// Spot length in seconds when the source carries it (bonus rows do).
    pub duration: f64,
    pub unit_cost: f64,
    pub tvr: f64,
    pub n_cost: f64,
    pub ntvr: f64,
    pub spots: u32,
    pub total_cost: f64,
    pub total_rating: f64,
}

impl SpotRow {
    /// Gross rating points contributed by this row.
    pub fn grp(&self) -> f64 {
        self.tvr * self.spots as f64
    }
}

/// A manually entered sponsorship/property placement.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyProgramRow {
    pub channel: String,
    pub program: String,
    pub commercial_name: String,
    pub language: String,
    pub day: String,
    pub time: String,
    /// PT/NPT classification, free text ("A - PT", "B - NPT", ...).
    pub slot: String,
    /// Negotiated on-cost actually paid.
    pub budget: f64,
    /// List-price unit rate.
    pub rate_card_cost: f64,
    pub duration: f64,
    pub tvr: f64,
    pub ntvr: f64,
    pub n_cost: f64,
    pub spots: u32,
    pub ngrp: f64,
    pub cprp: f64,
}

impl PropertyProgramRow {
    pub fn rate_card_total(&self) -> f64 {
        self.rate_card_cost * self.spots as f64
    }

    /// May be negative when the negotiated price exceeds rate card.
    pub fn total_saving(&self) -> f64 {
        self.rate_card_total() - self.budget
    }

    pub fn grp(&self) -> f64 {
        self.tvr * self.spots as f64
    }
}

/// The four normalized row sets the reconciliation runs over.
#[derive(Debug, Clone, Default)]
pub struct PlanInputs {
    pub spot_rows: Vec<SpotRow>,
    pub property_rows: Vec<PropertyProgramRow>,
    pub benefit_rows: Vec<SpotRow>,
    pub bonus_rows: Vec<SpotRow>,
}

// ---------------------------------------------------------------------------
// Aggregation output
// ---------------------------------------------------------------------------

/// Per-channel roll-up across all four sources.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelAggregate {
    pub channel: String,
    /// Spot-buying spend only.
    pub cost: f64,
    /// Property budget + benefit optimizer spend.
    pub property_value: f64,
    pub total_cost: f64,
    pub grp_spot: f64,
    pub grp_property: f64,
    pub grp_bonus: f64,
    pub grp_total: f64,
    pub ngrp_spot: f64,
    pub ngrp_property: f64,
    pub ngrp_bonus: f64,
    pub ngrp_total: f64,
    /// Always `total_cost / ngrp_total`, 0 when ngrp_total is 0. Never
    /// summed or averaged across channels.
    pub cprp: f64,
}

/// All rows belonging to one canonical commercial key, with billed totals.
/// Bonus rows are kept in their own bucket: bonus is unpaid inventory and is
/// never merged into the billed total.
#[derive(Debug, Clone, Serialize)]
pub struct CommercialAllocation {
    pub key: CommercialKey,
    pub display_name: String,
    pub language: String,
    /// Spot + benefit rows, merged per identity key.
    pub rows: Vec<SpotRow>,
    pub total_cost: f64,
    pub total_rating: f64,
    pub cprp: f64,
    pub bonus_rows: Vec<SpotRow>,
    pub bonus_rating: f64,
}

/// Report-level KPI set: the channel sums rolled up once more.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KpiSet {
    pub total_budget: f64,
    pub grp_spot: f64,
    pub grp_property: f64,
    pub grp_bonus: f64,
    pub grp_total: f64,
    pub ngrp_spot: f64,
    pub ngrp_property: f64,
    pub ngrp_bonus: f64,
    pub ngrp_total: f64,
    pub cprp: f64,
}

// ---------------------------------------------------------------------------
// Report metadata
// ---------------------------------------------------------------------------

/// Export metadata entered alongside the plan (client, campaign, activation
/// window, per-commercial display names). Passed in explicitly — the engine
/// holds no ambient lookup state.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub client: String,
    pub activity: String,
    pub brand: String,
    pub campaign: String,
    pub target_group: String,
    pub tv_budget: String,
    pub duration_label: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub ref_no: String,
    pub commercial_names: BTreeMap<CommercialKey, String>,
    pub commercial_languages: BTreeMap<CommercialKey, String>,
    /// Commercial durations in seconds, used for rate-card derivations.
    pub commercial_durations: BTreeMap<CommercialKey, f64>,
}

impl ReportMeta {
    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> Self {
        ReportMeta {
            client: String::new(),
            activity: "TV Schedule".into(),
            brand: String::new(),
            campaign: String::new(),
            target_group: String::new(),
            tv_budget: String::new(),
            duration_label: String::new(),
            from_date,
            to_date,
            ref_no: String::new(),
            commercial_names: BTreeMap::new(),
            commercial_languages: BTreeMap::new(),
            commercial_durations: BTreeMap::new(),
        }
    }

    /// Display name for a commercial, falling back to its canonical key.
    pub fn commercial_name(&self, key: &CommercialKey) -> String {
        self.commercial_names
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn commercial_language(&self, key: &CommercialKey) -> String {
        self.commercial_languages.get(key).cloned().unwrap_or_default()
    }

    pub fn commercial_duration(&self, key: &CommercialKey) -> f64 {
        self.commercial_durations.get(key).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Summary + Report
// ---------------------------------------------------------------------------

/// Row counts observed during reconciliation, for display and diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileSummary {
    pub spot_rows: usize,
    pub property_rows: usize,
    pub benefit_rows: usize,
    pub bonus_rows: usize,
    pub channels: usize,
    pub commercials: usize,
    /// Benefit rows folded into a matching spot row instead of standing alone.
    pub merged_rows: usize,
}

/// The reconciled final plan. A value object: rebuilt from scratch whenever
/// any upstream result set changes, never patched in place.
#[derive(Debug, Clone, Serialize)]
pub struct FinalPlanReport {
    pub meta: ReportMeta,
    pub kpis: KpiSet,
    pub channels: Vec<ChannelAggregate>,
    pub commercials: Vec<CommercialAllocation>,
    pub property_rows: Vec<PropertyProgramRow>,
    pub bonus_rows: Vec<SpotRow>,
    pub summary: ReconcileSummary,
}

impl FinalPlanReport {
    /// Sorted union of every channel named by any source.
    pub fn channel_names(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.channel.clone()).collect()
    }
}

/// Guarded cost-per-rating-point: 0 instead of NaN/Infinity on a zero
/// denominator. The single definition used at every level.
pub fn safe_cprp(total_cost: f64, ngrp: f64) -> f64 {
    if ngrp > 0.0 {
        total_cost / ngrp
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cprp_guards_zero_denominator() {
        assert_eq!(safe_cprp(2500.0, 0.0), 0.0);
        assert_eq!(safe_cprp(2500.0, 25.0), 100.0);
        assert_eq!(safe_cprp(0.0, 0.0), 0.0);
    }

    #[test]
    fn source_numbering_conventions() {
        assert!(Source::Spot.zero_based_commercials());
        assert!(!Source::Benefit.zero_based_commercials());
        assert!(!Source::Bonus.zero_based_commercials());
        assert!(!Source::Property.zero_based_commercials());
    }

    #[test]
    fn property_row_derivations() {
        let row = PropertyProgramRow {
            channel: "DERANA".into(),
            program: "Morning Show".into(),
            commercial_name: "COM_1".into(),
            language: "Sinhala".into(),
            day: "Mon".into(),
            time: "07:00".into(),
            slot: "A - PT".into(),
            budget: 500.0,
            rate_card_cost: 300.0,
            duration: 30.0,
            tvr: 5.0,
            ntvr: 5.0,
            n_cost: 500.0,
            spots: 2,
            ngrp: 10.0,
            cprp: 50.0,
        };
        assert_eq!(row.rate_card_total(), 600.0);
        assert_eq!(row.total_saving(), 100.0);
        assert_eq!(row.grp(), 10.0);
    }

    #[test]
    fn saving_may_be_negative() {
        let row = PropertyProgramRow {
            channel: "TV1".into(),
            program: "P".into(),
            commercial_name: String::new(),
            language: String::new(),
            day: String::new(),
            time: String::new(),
            slot: String::new(),
            budget: 1000.0,
            rate_card_cost: 100.0,
            duration: 0.0,
            tvr: 0.0,
            ntvr: 0.0,
            n_cost: 0.0,
            spots: 1,
            ngrp: 0.0,
            cprp: 0.0,
        };
        assert_eq!(row.total_saving(), -900.0);
    }
}
