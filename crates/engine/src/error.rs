use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Activation range where the end date precedes the start date.
    InvalidRange { from: NaiveDate, to: NaiveDate },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRange { from, to } => {
                write!(f, "invalid activation range: {to} is before {from}")
            }
        }
    }
}

impl std::error::Error for PlanError {}
