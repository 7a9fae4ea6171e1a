use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Optimizer requests
// ---------------------------------------------------------------------------

/// Body for the spot-buying and commercial-benefit optimizations. The two
/// runs share a wire shape but draw on separate budget pools.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeRequest {
    pub df_full: Vec<Value>,
    pub budget: f64,
    pub budget_bound: f64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub budget_shares: BTreeMap<String, f64>,
    pub num_commercials: u32,
    pub min_spots: u32,
    pub max_spots: u32,
    pub prime_pct: f64,
    pub nonprime_pct: f64,
    pub time_limit: u32,
}

impl Default for OptimizeRequest {
    fn default() -> Self {
        OptimizeRequest {
            df_full: Vec::new(),
            budget: 0.0,
            budget_bound: 0.0,
            budget_shares: BTreeMap::new(),
            num_commercials: 1,
            min_spots: 0,
            max_spots: 10,
            prime_pct: 80.0,
            nonprime_pct: 20.0,
            time_limit: 120,
        }
    }
}

/// Body for the bonus-spot optimization: unpaid inventory allocated against
/// per-channel/per-commercial spend *targets* (with a tolerance band), not
/// hard costs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusOptimizeRequest {
    pub channels: Vec<String>,
    pub bonus_budgets_by_channel: BTreeMap<String, f64>,
    pub program_rows: Vec<Value>,
    pub commercial_targets_by_channel: BTreeMap<String, BTreeMap<String, f64>>,
    pub commercial_tolerance_pct: f64,
    pub default_channel_allow_pct: f64,
    pub max_spots: u32,
    pub time_limit_sec: u32,
}

impl Default for BonusOptimizeRequest {
    fn default() -> Self {
        BonusOptimizeRequest {
            channels: Vec::new(),
            bonus_budgets_by_channel: BTreeMap::new(),
            program_rows: Vec::new(),
            commercial_targets_by_channel: BTreeMap::new(),
            commercial_tolerance_pct: 0.05,
            default_channel_allow_pct: 0.10,
            max_spots: 20,
            time_limit_sec: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// Optimizer response
// ---------------------------------------------------------------------------

/// Shared response shape of all three optimizer services. Every field is
/// optional on the wire; rows arrive as raw JSON and are normalized by the
/// engine, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptimizerResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub df_result: Vec<Value>,
    #[serde(default)]
    pub channel_summary: Vec<Value>,
    #[serde(default)]
    pub commercials_summary: Vec<Value>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub total_rating: Option<f64>,
    #[serde(default)]
    pub solver_status: Option<String>,
    #[serde(default)]
    pub is_optimal: Option<bool>,
    #[serde(default)]
    pub feasible_but_not_optimal: Option<bool>,
}

// ---------------------------------------------------------------------------
// Plan persistence
// ---------------------------------------------------------------------------

/// Metadata block sent alongside the opaque session snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanMetadata {
    pub client_name: String,
    pub brand_name: String,
    pub campaign: String,
    pub activity: String,
    pub tv_budget: String,
    pub duration_label: String,
    pub activation_from: String,
    pub activation_to: String,
    pub commercial_names: BTreeMap<String, String>,
    pub commercial_languages: BTreeMap<String, String>,
    pub selected_tg: String,
    pub total_budget: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SavePlanRequest {
    pub user_id: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub metadata: PlanMetadata,
    /// Opaque session snapshot; the service stores it verbatim.
    pub session_data: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavePlanResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
