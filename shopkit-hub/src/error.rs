//! Hub client error types.

use thiserror::Error;

/// Result type for Hub operations.
pub type HubResult<T> = Result<T, HubError>;

/// Errors returned by the Hub client.
#[derive(Debug, Error)]
pub enum HubError {
    /// The Hub does not know this tenant or license (HTTP 404).
    #[error("tenant or license not found: {0}")]
    LicenseNotFound(String),

    /// The Hub rejected the request parameters (HTTP 400).
    #[error("invalid activation parameters: {0}")]
    InvalidParameters(String),

    /// The Hub answered with an unexpected status code.
    #[error("Hub returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The Hub could not be reached (DNS, connect, timeout).
    #[error("communication with the Hub failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The Hub answered 2xx but the body was not the expected shape.
    #[error("malformed Hub response: {0}")]
    MalformedResponse(String),
}

impl HubError {
    /// Returns true if the Hub was unreachable rather than answering.
    ///
    /// Callers use this to distinguish "the Hub said no" from "we could
    /// not ask": only the former may change cached license state.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, HubError::Network(_))
    }
}
