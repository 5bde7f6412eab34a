//! Durable license credential storage for ShopKit.
//!
//! Stores one signed license token per (tenant, device). The OS credential
//! store is preferred; when it is unavailable the token lives in an
//! encrypted file under the user data directory instead. Which backend is
//! used is decided by a single probe when the store is opened and stays
//! fixed for the life of the process, so reads within a session never see
//! two backends disagree.

mod cipher;
mod error;
mod file;
mod keychain;

pub use error::{VaultError, VaultResult};

use file::FileVault;
use keychain::KeychainVault;
use shopkit_types::{DeviceId, TenantId};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// The storage backend selected for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultBackend {
    /// Platform keychain (macOS Keychain, Windows Credential Manager,
    /// Secret Service on Linux).
    Keychain,
    /// Encrypted file under the user data directory.
    EncryptedFile,
}

/// Configuration for opening a [`TokenStore`].
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Service name for keychain entries.
    pub service: String,
    /// Override for the fallback file location. `None` uses the fixed
    /// per-user path.
    pub file_path: Option<PathBuf>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            service: "shopkit-licensing".to_string(),
            file_path: None,
        }
    }
}

/// Durable storage of the signed license token.
pub struct TokenStore {
    backend: VaultBackend,
    keychain: KeychainVault,
    file: FileVault,
}

impl TokenStore {
    /// Opens the store, probing the keychain once to pick the backend.
    ///
    /// # Errors
    ///
    /// Returns an error only if the fallback file location cannot be
    /// resolved; keychain unavailability selects the fallback instead of
    /// failing.
    pub fn open() -> VaultResult<Self> {
        Self::with_config(VaultConfig::default())
    }

    /// Opens the store with explicit configuration.
    pub fn with_config(config: VaultConfig) -> VaultResult<Self> {
        let keychain = KeychainVault::new(config.service.clone());
        let backend = if keychain.probe() {
            VaultBackend::Keychain
        } else {
            warn!("OS credential store unavailable, using encrypted file fallback");
            VaultBackend::EncryptedFile
        };
        info!(?backend, "credential vault opened");
        Self::build(backend, config)
    }

    /// Opens the store with a fixed backend, skipping the probe.
    ///
    /// Intended for tests and embedders that manage backend selection
    /// themselves.
    pub fn with_backend(backend: VaultBackend, config: VaultConfig) -> VaultResult<Self> {
        Self::build(backend, config)
    }

    fn build(backend: VaultBackend, config: VaultConfig) -> VaultResult<Self> {
        let file_path = match config.file_path {
            Some(path) => path,
            None => FileVault::default_path()?,
        };
        Ok(Self {
            backend,
            keychain: KeychainVault::new(config.service),
            file: FileVault::new(file_path),
        })
    }

    /// Returns the backend selected when the store was opened.
    #[must_use]
    pub fn backend(&self) -> VaultBackend {
        self.backend
    }

    /// Persists the token, fully replacing any prior value for that
    /// (tenant, device).
    pub fn save(
        &self,
        tenant_id: &TenantId,
        device_id: &DeviceId,
        token: &str,
    ) -> VaultResult<()> {
        match self.backend {
            VaultBackend::Keychain => self.keychain.save(tenant_id, device_id, token),
            VaultBackend::EncryptedFile => self.file.save(tenant_id, device_id, token),
        }
    }

    /// Returns the stored token, or `None` if nothing usable is stored.
    ///
    /// Backend failures and undecryptable fallback records are logged and
    /// reported as absent rather than surfaced as errors.
    #[must_use]
    pub fn get(&self, tenant_id: &TenantId, device_id: &DeviceId) -> Option<String> {
        match self.backend {
            VaultBackend::Keychain => self.keychain.load(tenant_id, device_id),
            VaultBackend::EncryptedFile => self.file.load(tenant_id, device_id),
        }
    }

    /// Removes the credential from every backend.
    ///
    /// Sweeping both keeps a later backend flip (say, after an OS upgrade
    /// restores the keychain) from resurrecting an old credential. Absent
    /// entries are not errors, and a failure in the inactive backend is
    /// logged rather than propagated.
    pub fn delete(&self, tenant_id: &TenantId, device_id: &DeviceId) -> VaultResult<()> {
        match self.backend {
            VaultBackend::Keychain => {
                if let Err(e) = self.file.delete() {
                    warn!("fallback file cleanup failed: {e}");
                }
                self.keychain.delete(tenant_id, device_id)
            }
            VaultBackend::EncryptedFile => {
                if let Err(e) = self.keychain.delete(tenant_id, device_id) {
                    debug!("keychain cleanup skipped: {e}");
                }
                self.file.delete()
            }
        }
    }
}
