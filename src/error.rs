//! Error types for the receipt2csv library.
//!
//! Two error types map onto the two places a run can go wrong:
//!
//! * [`ReceiptError`] — everything returned from the top-level `extract*`
//!   functions: configuration problems, local file I/O, and a wrapped
//!   service failure.
//!
//! * [`ServiceError`] — anything that went wrong while talking to the remote
//!   extraction service or decoding its reply. The CLI reports these as
//!   "the call failed" and exits; it never retries.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the receipt2csv library.
#[derive(Debug, Error)]
pub enum ReceiptError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// No API key was supplied on the command line or in the environment.
    #[error("API key must be provided via --api-key or ANTHROPIC_API_KEY env var.")]
    MissingApiKey,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// The receipt file could not be read.
    #[error("Failed to read input file '{path}': {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output CSV file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Service errors ────────────────────────────────────────────────────
    /// The remote call failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A failure while calling the extraction service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never produced an HTTP response (DNS, connect, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ServiceError::InvalidResponse(e.to_string())
        } else {
            ServiceError::Transport(e.to_string())
        }
    }
}
