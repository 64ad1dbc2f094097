//! Error types and handling
//!
//! Taxonomy shared by the coordinator and the HTTP boundary.

use crate::capture::CaptureError;
use crate::publish::PublishError;
use crate::recorder::state::ConfigError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure surfaced by the recording coordinator.
///
/// `InvalidConfig`, `SessionAlreadyActive` and `NoActiveSession` never mutate
/// session state; `Capture`, `Publish` and `Timeout` move the session to
/// Failed.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("invalid recording config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("a recording session is already in progress")]
    SessionAlreadyActive,

    #[error("no active recording session")]
    NoActiveSession,

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("capture {stage} exceeded the {deadline_secs}s pipeline deadline")]
    Timeout {
        stage: &'static str,
        deadline_secs: u64,
    },
}

impl RecorderError {
    /// Stable wire code distinguishing the failure class.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::SessionAlreadyActive => "SESSION_ALREADY_ACTIVE",
            Self::NoActiveSession => "NO_ACTIVE_SESSION",
            Self::Capture(_) => "CAPTURE_ERROR",
            Self::Publish(_) => "PUBLISH_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
        }
    }
}

/// Error body returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&RecorderError> for ErrorResponse {
    fn from(error: &RecorderError) -> Self {
        ErrorResponse {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using RecorderError.
pub type RecorderResult<T> = Result<T, RecorderError>;
