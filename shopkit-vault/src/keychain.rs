//! OS credential store backend.

use crate::error::{VaultError, VaultResult};
use keyring::Entry;
use shopkit_types::{DeviceId, TenantId};
use tracing::{debug, warn};

/// Account name used for the availability probe.
const PROBE_ACCOUNT: &str = "__shopkit_probe__";

/// Credential storage in the platform keychain.
///
/// Entries are keyed `"{tenant}:{device}"` under a fixed service name.
pub(crate) struct KeychainVault {
    service: String,
}

impl KeychainVault {
    pub(crate) fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, tenant_id: &TenantId, device_id: &DeviceId) -> VaultResult<Entry> {
        let account = format!("{tenant_id}:{device_id}");
        Entry::new(&self.service, &account).map_err(|e| VaultError::Backend(e.to_string()))
    }

    /// Checks whether the keychain actually works on this host by writing,
    /// reading back and deleting a probe entry. Headless sessions and
    /// containers commonly expose a keychain API that fails on first use.
    pub(crate) fn probe(&self) -> bool {
        let entry = match Entry::new(&self.service, PROBE_ACCOUNT) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("keychain probe: cannot create entry: {e}");
                return false;
            }
        };
        if let Err(e) = entry.set_password("probe") {
            debug!("keychain probe: write failed: {e}");
            return false;
        }
        let readable = entry.get_password().is_ok();
        if let Err(e) = entry.delete_credential() {
            debug!("keychain probe: cleanup failed: {e}");
        }
        readable
    }

    pub(crate) fn save(
        &self,
        tenant_id: &TenantId,
        device_id: &DeviceId,
        token: &str,
    ) -> VaultResult<()> {
        self.entry(tenant_id, device_id)?
            .set_password(token)
            .map_err(|e| VaultError::Backend(e.to_string()))
    }

    pub(crate) fn load(&self, tenant_id: &TenantId, device_id: &DeviceId) -> Option<String> {
        let entry = match self.entry(tenant_id, device_id) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("keychain entry unavailable: {e}");
                return None;
            }
        };
        match entry.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!("keychain read failed, treating as absent: {e}");
                None
            }
        }
    }

    /// Removes the entry. A missing entry is not an error.
    pub(crate) fn delete(&self, tenant_id: &TenantId, device_id: &DeviceId) -> VaultResult<()> {
        match self.entry(tenant_id, device_id)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(VaultError::Backend(e.to_string())),
        }
    }
}
