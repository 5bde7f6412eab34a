//! Error types for token decoding and verification.

use thiserror::Error;

/// Errors raised while decoding or verifying a license token.
///
/// Every variant means "no valid token": callers treat a failed decode the
/// same as an absent credential and fail closed.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token string is not `payload.signature` or is not valid base64.
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// Ed25519 signature verification failed.
    #[error("token signature invalid")]
    InvalidSignature,

    /// The payload JSON is malformed, has unknown fields, or violates a
    /// claims invariant.
    #[error("invalid token payload: {0}")]
    InvalidPayload(String),

    /// The configured public key could not be parsed.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;
