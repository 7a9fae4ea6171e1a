//! `spotplan-export` — workbook emitter for the reconciled final plan.
//!
//! Two-pass design: [`layout`] first materializes every sheet as typed rows
//! with stable worksheet indices, then [`workbook`] serializes that plan to
//! XLSX. Formula emission always references the fixed indices from pass one,
//! never a live row counter.

pub mod error;
pub mod layout;
pub mod styles;
pub mod workbook;

pub use error::ExportError;
pub use layout::{build_workbook_plan, CellSpec, EmitMode, WorkbookPlan};
pub use workbook::{emit, workbook_filename, EmitResult};
