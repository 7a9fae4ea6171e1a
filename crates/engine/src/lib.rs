//! `spotplan-engine` — Final-plan reconciliation and aggregation engine.
//!
//! Pure engine crate: receives pre-loaded optimizer result rows and manually
//! entered property programs, returns one reconciled report. No HTTP or file
//! IO dependencies.

pub mod aggregate;
pub mod commercial;
pub mod config;
pub mod dategrid;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;

pub use aggregate::reconcile;
pub use commercial::CommercialKey;
pub use config::TargetGroupCatalog;
pub use dategrid::{build_date_grid, DateGrid};
pub use error::PlanError;
pub use merge::{identity_key, merge_rows};
pub use model::{
    FinalPlanReport, PlanInputs, PropertyProgramRow, ReportMeta, Source, SpotRow,
};
