//! Planner service HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). Covers the three
//! optimizer runs (spot buying, commercial benefit, bonus) and plan
//! persistence. A non-2xx status or `success: false` payload surfaces as a
//! typed error — callers never apply a failed response to the plan.

use std::time::Duration;

use crate::model::{
    BonusOptimizeRequest, OptimizeRequest, OptimizerResponse, SavePlanRequest, SavePlanResponse,
};

/// Error type for planner service calls.
#[derive(Debug)]
pub enum ClientError {
    /// Network error (connect, timeout, body read).
    Network(String),
    /// HTTP error with status code.
    Http(u16, String),
    /// JSON parsing error.
    Parse(String),
    /// The solver ran but reported failure (infeasible, no incumbent, ...).
    Solver { message: String, solver_status: Option<String> },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            ClientError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ClientError::Solver { message, solver_status } => match solver_status {
                Some(status) => write!(f, "Solver failed ({status}): {message}"),
                None => write!(f, "Solver failed: {message}"),
            },
        }
    }
}

impl std::error::Error for ClientError {}

/// Planner API client (blocking).
#[derive(Clone)]
pub struct PlannerClient {
    http: reqwest::blocking::Client,
    api_base: String,
}

impl PlannerClient {
    pub fn new(api_base: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(PlannerClient {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn post_optimize<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<OptimizerResponse, ClientError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        // Solver failures come back as JSON bodies on 2xx and 4xx alike;
        // prefer the payload's message over a bare status line.
        let parsed: Result<OptimizerResponse, _> = serde_json::from_str(&text);
        match parsed {
            Ok(resp) if resp.success && status.is_success() => Ok(resp),
            Ok(resp) => Err(ClientError::Solver {
                message: resp
                    .message
                    .unwrap_or_else(|| format!("optimizer rejected the request ({status})")),
                solver_status: resp.solver_status,
            }),
            Err(_) if !status.is_success() => {
                Err(ClientError::Http(status.as_u16(), truncate(&text)))
            }
            Err(e) => Err(ClientError::Parse(e.to_string())),
        }
    }

    /// Run the main spot-buying optimization.
    pub fn optimize_spots(&self, req: &OptimizeRequest) -> Result<OptimizerResponse, ClientError> {
        self.post_optimize("/optimize-by-budget-share", req)
    }

    /// Run the commercial-benefit optimization (separate budget pool,
    /// same wire shape).
    pub fn optimize_benefit(&self, req: &OptimizeRequest) -> Result<OptimizerResponse, ClientError> {
        self.post_optimize("/optimize-by-budget-share", req)
    }

    /// Run the bonus-spot optimization over unpaid inventory.
    pub fn optimize_bonus(
        &self,
        req: &BonusOptimizeRequest,
    ) -> Result<OptimizerResponse, ClientError> {
        self.post_optimize("/optimize-bonus", req)
    }

    /// Persist a plan snapshot. Only success/failure matters to callers.
    pub fn save_plan(&self, req: &SavePlanRequest) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url("/save-plan"))
            .json(req)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let parsed: SavePlanResponse = serde_json::from_str(&text).unwrap_or_default();
        if status.is_success() && parsed.success {
            Ok(())
        } else if let Some(error) = parsed.error {
            Err(ClientError::Http(status.as_u16(), error))
        } else {
            Err(ClientError::Http(status.as_u16(), truncate(&text)))
        }
    }
}

fn truncate(text: &str) -> String {
    const MAX: usize = 200;
    if text.len() <= MAX {
        text.to_string()
    } else {
        let mut end = MAX;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &text[..end])
    }
}
