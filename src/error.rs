//! Error types
//!
//! Business-logic misses (a tier finding nothing, a final "not found") are
//! not errors and never appear here.

use thiserror::Error;

/// Failure talking to the remote record store or the suggestion endpoint
///
/// Always absorbed by the resolver and treated as "no result".
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("HTTP status {0}: {1}")]
    Status(u16, String),

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("Timed out after {0} ms")]
    Timeout(u64),
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CollaboratorError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            CollaboratorError::Status(status.as_u16(), err.to_string())
        } else {
            CollaboratorError::Transport(err.to_string())
        }
    }
}

/// Failure loading the local dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),
}

/// Query rejected before any tier runs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Plant name must not be empty")]
    InvalidQuery,
}

/// Input validation failures for a bloom calculation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("Plant name must not be empty")]
    InvalidQuery,

    #[error("Unrecognised sowing month '{0}'")]
    InvalidMonth(String),
}

impl From<ResolveError> for CalculationError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::InvalidQuery => CalculationError::InvalidQuery,
        }
    }
}
