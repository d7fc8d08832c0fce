//! Ingestion error types.

use thiserror::Error;

/// Errors that can occur while loading or fetching input data.
#[derive(Debug, Error)]
pub enum EtlError {
    /// A file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A data file could not be parsed.
    #[error("parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// A required column is missing from a data file.
    #[error("missing column {column} in {path}")]
    MissingColumn { path: String, column: String },

    /// An HTTP request to an external source failed.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The external source returned a rate-limit response.
    #[error("rate limited by {source_name}")]
    RateLimited { source_name: String },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// An error propagated from the core domain layer.
    #[error("core error: {0}")]
    Core(#[from] easterbush_core::Error),

    /// Input data violated an expectation.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl EtlError {
    /// Returns `true` when the error is transient and the operation may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::RateLimited { .. })
    }
}

/// Convenience alias for ingestion results.
pub type EtlResult<T> = std::result::Result<T, EtlError>;
