use std::fmt;

use spotplan_engine::PlanError;

#[derive(Debug)]
pub enum ExportError {
    /// Invalid activation range — raised before any sheet is built.
    Range(PlanError),
    /// Workbook serialization failure. In-memory aggregation state is
    /// untouched, so the export can be retried.
    Workbook(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(e) => write!(f, "{e}"),
            Self::Workbook(msg) => write!(f, "workbook export failed: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<PlanError> for ExportError {
    fn from(e: PlanError) -> Self {
        ExportError::Range(e)
    }
}
