//! The licensing service: activation, status resolution and the
//! last-known-status snapshot.

use crate::config::LicensingConfig;
use crate::device;
use crate::error::{LicensingError, LicensingResult};
use crate::status::{resolve_status, LicenseState, LicenseStatus};
use chrono::{DateTime, Utc};
use shopkit_hub::{ActivateRequest, HubClient};
use shopkit_token::{Claims, TokenVerifier};
use shopkit_types::{DeviceId, TenantId};
use shopkit_vault::TokenStore;
use std::collections::BTreeSet;
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// Outcome of a successful activation or renewal.
#[derive(Debug, Clone)]
pub struct Activation {
    /// The licensed plan.
    pub plan: String,
    /// When the new credential expires.
    pub expires_at: DateTime<Utc>,
    /// Grace days granted past expiry.
    pub grace_days: u32,
    /// Capabilities the license grants.
    pub entitlements: BTreeSet<String>,
}

/// Installation-level status for the setup flow.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InstallStatus {
    /// The installation needs the setup/activation flow.
    pub needs_setup: bool,
    /// The classified state behind that answer.
    pub status: LicenseState,
    /// User-facing explanation.
    pub message: String,
}

/// Orchestrates the vault, the verifier and the Hub into one status API.
///
/// All mutation of stored credentials goes through this type, and a failed
/// Hub call never changes what is stored: a transient network blip must
/// not flip a valid license to invalid, and an activation error must not
/// revoke a previously cached credential.
pub struct LicensingService {
    config: LicensingConfig,
    tenant_id: Option<TenantId>,
    device_id: DeviceId,
    vault: TokenStore,
    verifier: TokenVerifier,
    hub: HubClient,
    /// Last-known status. Single writer (service methods), many readers.
    snapshot: RwLock<Option<LicenseStatus>>,
}

impl LicensingService {
    /// Wires the service from its collaborators.
    ///
    /// The device identity is resolved here: the configured `DEVICE_ID`
    /// wins, otherwise a stable machine-derived identifier is used.
    pub fn new(
        config: LicensingConfig,
        vault: TokenStore,
        verifier: TokenVerifier,
        hub: HubClient,
    ) -> Self {
        let tenant_id = config.tenant_id.clone();
        let device_id = config
            .device_id
            .clone()
            .unwrap_or_else(device::fallback_device_id);
        Self {
            config,
            tenant_id,
            device_id,
            vault,
            verifier,
            hub,
            snapshot: RwLock::new(None),
        }
    }

    /// Whether enforcement is on. Unset configuration fails closed.
    pub(crate) fn enforced(&self) -> bool {
        self.config.enforced.unwrap_or(true)
    }

    pub(crate) fn config(&self) -> &LicensingConfig {
        &self.config
    }

    /// The resolved device identity for this installation.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    fn identity(&self) -> LicensingResult<(&TenantId, &DeviceId)> {
        let tenant = self.tenant_id.as_ref().ok_or_else(|| {
            LicensingError::Configuration("TENANT_ID is not set".to_string())
        })?;
        Ok((tenant, &self.device_id))
    }

    /// Loads and verifies the stored credential, if any.
    ///
    /// A token that fails verification is reported as absent: a malformed
    /// or tampered credential must fail closed, not crash the caller.
    #[must_use]
    pub fn stored_claims(&self) -> Option<Claims> {
        let tenant = self.tenant_id.as_ref()?;
        let token = self.vault.get(tenant, &self.device_id)?;
        match self.verifier.verify(&token) {
            Ok(claims) => {
                if claims.tenant_id != *tenant || claims.device_id != self.device_id {
                    debug!("stored token names a different tenant/device, treating as unlicensed");
                    return None;
                }
                Some(claims)
            }
            Err(e) => {
                debug!("stored token failed verification, treating as unlicensed: {e}");
                None
            }
        }
    }

    /// Classifies the license from local state alone.
    pub(crate) fn resolve_local(&self, now: DateTime<Utc>) -> LicenseStatus {
        if !self.enforced() {
            return LicenseStatus::development();
        }
        if self.tenant_id.is_none() {
            return LicenseStatus::not_registered();
        }
        let claims = self.stored_claims();
        resolve_status(true, claims.as_ref(), now)
    }

    /// Activates this installation with the Hub and persists the token.
    ///
    /// Used with a license key for first activation; renewal goes through
    /// the same path without one.
    ///
    /// # Errors
    ///
    /// Hub rejections (404 → not found, 400 → invalid parameters) and
    /// network failures come back as distinct errors. On any failure the
    /// previously stored credential and cached status are untouched.
    pub async fn activate(&self, license_key: Option<&str>) -> LicensingResult<Activation> {
        let claims = self.activate_inner(license_key).await?;
        Ok(Activation {
            plan: claims.plan.clone(),
            expires_at: claims.expires_at,
            grace_days: claims.grace_days,
            entitlements: claims.entitlements.clone(),
        })
    }

    async fn activate_inner(&self, license_key: Option<&str>) -> LicensingResult<Claims> {
        let (tenant, device) = self.identity()?;
        let request = ActivateRequest {
            tenant_id: tenant.clone(),
            device_id: device.clone(),
            license_key: license_key.map(String::from),
        };

        let response = self.hub.activate(&request).await?;
        let claims = self.verifier.verify(&response.license_token)?;
        self.vault.save(tenant, device, &response.license_token)?;
        info!(plan = %claims.plan, expires = %claims.expires_at, "license activated");

        let mut status = resolve_status(self.enforced(), Some(&claims), Utc::now());
        status.cached = false;
        self.store_snapshot(&status);
        Ok(claims)
    }

    /// Renews the current license through the activation path.
    pub(crate) async fn renew(&self) -> LicensingResult<Claims> {
        self.activate_inner(None).await
    }

    /// Removes the stored credential.
    pub fn deactivate(&self) -> LicensingResult<()> {
        let (tenant, device) = self.identity()?;
        self.vault.delete(tenant, device)?;
        info!("license credential removed");
        let status = self.resolve_local(Utc::now());
        self.store_snapshot(&status);
        Ok(())
    }

    /// Returns the current license status.
    ///
    /// With `refresh`, a Hub round-trip is attempted first and the result
    /// is tagged `cached: false`. When the Hub cannot be reached the
    /// previously stored credential answers instead; a refresh failure
    /// never downgrades a valid license.
    pub async fn check_status(&self, refresh: bool) -> LicenseStatus {
        let now = Utc::now();

        if refresh && self.enforced() && self.tenant_id.is_some() {
            match self.renew().await {
                Ok(claims) => {
                    let mut status = resolve_status(true, Some(&claims), now);
                    status.cached = false;
                    self.store_snapshot(&status);
                    return status;
                }
                Err(e) => {
                    warn!("status refresh via Hub failed, using stored credential: {e}");
                }
            }
        }

        let status = self.resolve_local(now);
        self.store_snapshot(&status);
        status
    }

    /// Installation status for the setup flow.
    #[must_use]
    pub fn install_status(&self) -> InstallStatus {
        let status = self.resolve_local(Utc::now());
        InstallStatus {
            needs_setup: status.needs_setup,
            status: status.state,
            message: status.message,
        }
    }

    /// The last status this service computed, if any.
    #[must_use]
    pub fn last_known_status(&self) -> Option<LicenseStatus> {
        self.snapshot.read().expect("snapshot lock poisoned").clone()
    }

    fn store_snapshot(&self, status: &LicenseStatus) {
        *self.snapshot.write().expect("snapshot lock poisoned") = Some(status.clone());
    }
}
