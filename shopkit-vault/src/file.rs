//! Encrypted-file fallback storage.
//!
//! Used when the OS credential store is unavailable. The record lives at
//! a fixed path under the user data directory and is sealed with a
//! device-derived key, so it neither survives copying to another machine
//! nor yields a silently-wrong token after corruption.

use crate::cipher::{self, VaultKey};
use crate::error::{VaultError, VaultResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopkit_types::{DeviceId, TenantId};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// File name of the fallback credential record.
const CREDENTIAL_FILE: &str = "credential.lic";

/// The plaintext record inside the encrypted file.
#[derive(Debug, Serialize, Deserialize)]
struct CredentialRecord {
    tenant_id: TenantId,
    device_id: DeviceId,
    token: String,
    timestamp: DateTime<Utc>,
}

/// Fallback credential storage in an encrypted file.
pub(crate) struct FileVault {
    path: PathBuf,
}

impl FileVault {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Resolves the fixed per-user location of the credential file.
    pub(crate) fn default_path() -> VaultResult<PathBuf> {
        let dir = dirs::data_dir().ok_or(VaultError::NoDataDir)?;
        Ok(dir.join("shopkit").join(CREDENTIAL_FILE))
    }

    /// Persists the token, replacing any prior record wholesale.
    ///
    /// The write goes to a temp file in the same directory followed by a
    /// rename, so a crash mid-write leaves the prior record intact.
    pub(crate) fn save(
        &self,
        tenant_id: &TenantId,
        device_id: &DeviceId,
        token: &str,
    ) -> VaultResult<()> {
        let record = CredentialRecord {
            tenant_id: tenant_id.clone(),
            device_id: device_id.clone(),
            token: token.to_string(),
            timestamp: Utc::now(),
        };
        let plaintext = serde_json::to_vec(&record)?;

        let key = VaultKey::for_device(device_id);
        let sealed = cipher::seal(&key, &plaintext)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, sealed)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Returns the stored token if the record decrypts with this device's
    /// key and names the requested tenant and device.
    ///
    /// Anything unreadable (missing file, corruption, a record written by
    /// a different device) is treated as absent.
    pub(crate) fn load(&self, tenant_id: &TenantId, device_id: &DeviceId) -> Option<String> {
        let sealed = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                debug!("credential file unreadable: {e}");
                return None;
            }
        };

        let key = VaultKey::for_device(device_id);
        let plaintext = match cipher::open(&key, &sealed) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                debug!("credential file undecryptable, treating as absent: {e}");
                return None;
            }
        };

        let record: CredentialRecord = match serde_json::from_slice(&plaintext) {
            Ok(record) => record,
            Err(e) => {
                debug!("credential record malformed, treating as absent: {e}");
                return None;
            }
        };

        if record.tenant_id != *tenant_id || record.device_id != *device_id {
            debug!("credential record is for a different tenant/device, treating as absent");
            return None;
        }

        Some(record.token)
    }

    /// Removes the credential file. Absence is not an error.
    pub(crate) fn delete(&self) -> VaultResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
