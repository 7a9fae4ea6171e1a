//! Display lookup tables passed into report building.

use std::collections::BTreeMap;

/// Target-group key → display label. Passed explicitly into report metadata
/// instead of living in ambient state; unknown keys fall back to themselves.
#[derive(Debug, Clone)]
pub struct TargetGroupCatalog {
    entries: BTreeMap<String, String>,
}

impl TargetGroupCatalog {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        TargetGroupCatalog { entries }
    }

    pub fn label_for(&self, key: &str) -> String {
        if key.is_empty() {
            return "Not specified".into();
        }
        self.entries.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

impl Default for TargetGroupCatalog {
    fn default() -> Self {
        let entries = [
            ("tvr_all", "All TG"),
            ("tvr_abc_15_90", "SEC ABC | Age 15-90"),
            ("tvr_abc_30_60", "SEC ABC | Age 30-60"),
            ("tvr_abc_15_30", "SEC ABC | Age 15-30"),
            ("tvr_abc_20_plus", "SEC ABC | Age 20+"),
            ("tvr_ab_15_plus", "SEC AB | Age 15+"),
            ("tvr_cd_15_plus", "SEC CD | Age 15+"),
            ("tvr_ab_female_15_45", "SEC AB | Female Age 15-45"),
            ("tvr_abc_15_60", "SEC ABC | Age 15-60"),
            ("tvr_bcde_15_plus", "SEC BCDE | Age 15+"),
            ("tvr_abcde_15_plus", "SEC ABCDE | Age 15+"),
            ("tvr_abc_female_15_60", "SEC ABC | Female Age 15-60"),
            ("tvr_abc_male_15_60", "SEC ABC | Male Age 15-60"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        TargetGroupCatalog { entries }
    }
}
