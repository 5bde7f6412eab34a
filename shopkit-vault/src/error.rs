//! Error types for credential storage.

use thiserror::Error;

/// Errors raised by the credential vault.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The OS credential store rejected an operation.
    #[error("credential store error: {0}")]
    Backend(String),

    /// Filesystem failure on the fallback path.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encryption or decryption of the fallback file failed.
    #[error("credential encryption error: {0}")]
    Crypto(String),

    /// The fallback record could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No user data directory is available for the fallback file.
    #[error("no user data directory available")]
    NoDataDir,
}

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;
