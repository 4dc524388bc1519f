//! Error types for publishing to ntfy.

use thiserror::Error;

/// Errors that can occur when publishing a notification
#[derive(Debug, Error)]
pub enum NtfyError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// ntfy answered with a non-success status
    #[error("ntfy returned {status}: {body}")]
    Rejected { status: u16, body: String },
}
