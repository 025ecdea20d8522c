//! Error type shared by the library

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Invalid assumption: {field} - {reason}")]
    InvalidAssumption { field: &'static str, reason: String },

    #[error("No simulation results to summarise")]
    EmptyResults,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PricingError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PricingError::InvalidAssumption {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;
