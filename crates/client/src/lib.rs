//! `spotplan-client` — HTTP client for the optimization and persistence
//! services.
//!
//! Blocking reqwest client (no Tokio runtime required). The engine treats
//! every service here as an external collaborator that may fail or return
//! partial data; a failed call never updates the plan.

pub mod client;
pub mod model;
pub mod slice;

pub use client::{ClientError, PlannerClient};
pub use model::{
    BonusOptimizeRequest, OptimizeRequest, OptimizerResponse, PlanMetadata, SavePlanRequest,
};
pub use slice::{RunToken, SliceGate};
