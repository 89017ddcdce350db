use reqwest::StatusCode;
use thiserror::Error;

use crate::flight::Action;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session is no longer authorized")]
    Unauthorized,

    #[error("Voting is currently closed")]
    NotAvailable,

    #[error("Server responded with {0}")]
    Status(StatusCode),

    #[error("Failed to submit votes")]
    SubmissionFailed,

    #[error("{0}")]
    ValidationFailed(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("{0} is already in progress")]
    Busy(Action),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Maps a non-success response status onto the error taxonomy. A 404
    /// only means "voting closed" on the vote state endpoint, which maps it
    /// there.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            other => ApiError::Status(other),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}
