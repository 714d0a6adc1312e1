// src/core/alert/error.rs
use serde::Serialize;
use thiserror::Error;

/// Location acquisition failures. Both abort the pipeline before anything
/// is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Permission to access location was denied")]
    PermissionDenied,

    #[error("Location acquisition timed out")]
    Timeout,
}

/// Notification dispatch failure. Non-fatal to the alert itself.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("Dispatch target unavailable: {0}")]
    Unavailable(String),

    #[error("Dispatch rejected: {0}")]
    Rejected(String),
}

/// Fatal submission failures. After either of these the system is in its
/// pre-attempt state: no alert record exists.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Location unavailable: {0}")]
    LocationUnavailable(#[from] LocationError),

    #[error("Failed to persist alert: {0}")]
    Persistence(String),
}

/// Non-fatal tail failures, surfaced alongside a successful submission.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SubmitWarning {
    ResponderLookup(String),
    RosterUpdate(String),
    Dispatch(String),
}

impl std::fmt::Display for SubmitWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitWarning::ResponderLookup(e) => write!(f, "responder lookup failed: {e}"),
            SubmitWarning::RosterUpdate(e) => write!(f, "roster update failed: {e}"),
            SubmitWarning::Dispatch(e) => write!(f, "dispatch failed: {e}"),
        }
    }
}
