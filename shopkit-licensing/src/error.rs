//! Error types for the licensing service layer.

use shopkit_hub::HubError;
use shopkit_token::TokenError;
use shopkit_vault::VaultError;
use thiserror::Error;

/// Errors surfaced by licensing operations.
///
/// The variants keep their origin visible so callers can distinguish "the
/// Hub said no" (`Hub`) from "we could not ask" and from local problems;
/// that distinction decides whether cached state may change.
#[derive(Debug, Error)]
pub enum LicensingError {
    /// A token failed to decode or verify.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The credential vault failed.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// The Hub rejected the call or was unreachable.
    #[error(transparent)]
    Hub(#[from] HubError),

    /// Tenant or device identity is not configured.
    #[error("licensing identity not configured: {0}")]
    Configuration(String),
}

/// Result type for licensing operations.
pub type LicensingResult<T> = Result<T, LicensingError>;
