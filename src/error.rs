//! Error types for clickup-sheets-sync
//!
//! This module provides the error taxonomy for a sync run:
//! - Transport and HTTP failures raised by the ClickUp fetcher
//! - Retry classification (rate limits back off, transport errors retry immediately)
//! - Configuration, decoding and sink failures
//!
//! Per-task failures during flattening are not represented here. They are logged
//! and counted in [`crate::types::SyncReport`] instead of aborting the run.

use thiserror::Error;

/// Result type alias for clickup-sheets-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for clickup-sheets-sync
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "retry.max_attempts")
        key: Option<String>,
    },

    /// Network-level failure (timeout, connection refused, body read/decode)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote API answered with HTTP 429
    #[error("rate limited by {url}")]
    RateLimited {
        /// The URL that was rate limited
        url: String,
    },

    /// Any other non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Http {
        /// The HTTP status code returned
        status: u16,
        /// The URL that returned it
        url: String,
    },

    /// The retry budget was consumed without a successful response
    #[error("maximum number of attempts ({attempts}) reached for {url}")]
    RetriesExhausted {
        /// The URL being fetched
        url: String,
        /// The number of attempts made
        attempts: u32,
    },

    /// A response body did not match the expected shape
    #[error("failed to decode {context}: {source}")]
    Decode {
        /// What was being decoded (e.g., "task 86abc detail")
        context: String,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The tabular export sink rejected the upload
    #[error("export error: {0}")]
    Sink(String),

    /// I/O error (config file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid user input (dates, times, time zone names)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a decode error with context
    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Decode {
            context: context.into(),
            source,
        }
    }

    /// Machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Transport(_) => "transport_error",
            Error::RateLimited { .. } => "rate_limited",
            Error::Http { .. } => "http_error",
            Error::RetriesExhausted { .. } => "retries_exhausted",
            Error::Decode { .. } => "decode_error",
            Error::Sink(_) => "sink_error",
            Error::Io(_) => "io_error",
            Error::InvalidInput(_) => "invalid_input",
        }
    }
}
