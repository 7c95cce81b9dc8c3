use std::{sync::Arc, time::Duration};

use reqwest::StatusCode;

/// Startup configuration errors. Any of these is fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be specified (set {var})")]
    MissingField {
        field: &'static str,
        var: &'static str,
    },
}

/// A failed attempt to obtain a weather reading.
///
/// Cloneable so a single failure can be handed to every caller waiting on the
/// same in-flight fetch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("weather request timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to send weather request: {0}")]
    Request(#[source] Arc<reqwest::Error>),

    #[error("weather provider responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to read weather response body: {0}")]
    Body(#[source] Arc<reqwest::Error>),

    #[error("failed to decode weather response: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    #[error("weather fetch task did not complete: {0}")]
    Aborted(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }
}
