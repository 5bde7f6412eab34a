//! The composition root.
//!
//! One explicit context object wires the vault, verifier, Hub client,
//! service and scheduler in dependency order at process start. Guards are
//! handed out from here; nothing is looked up through globals.

use crate::config::LicensingConfig;
use crate::error::LicensingResult;
use crate::guard::{RequestGuard, StartupGate};
use crate::renewal::RenewalScheduler;
use crate::service::LicensingService;
use shopkit_hub::{HubClient, HubConfig};
use shopkit_token::TokenVerifier;
use shopkit_vault::TokenStore;
use std::sync::Arc;

/// Everything the licensing core needs, wired once at process start.
pub struct LicensingContext {
    service: Arc<LicensingService>,
    scheduler: Arc<RenewalScheduler>,
}

impl LicensingContext {
    /// Builds the context, probing the credential vault backend once.
    ///
    /// # Errors
    ///
    /// Fails if the configured public key cannot be parsed or no storage
    /// location can be resolved.
    pub fn bootstrap(config: LicensingConfig) -> LicensingResult<Self> {
        let vault = TokenStore::open()?;
        Self::bootstrap_with_store(config, vault)
    }

    /// Builds the context around an already-opened vault.
    ///
    /// Lets tests and embedders control backend selection and storage
    /// location.
    pub fn bootstrap_with_store(
        config: LicensingConfig,
        vault: TokenStore,
    ) -> LicensingResult<Self> {
        let verifier = match &config.public_key_pem {
            Some(pem) => TokenVerifier::from_pem(pem)?,
            None => TokenVerifier::unverified(),
        };
        let hub = HubClient::new(HubConfig {
            base_url: config.hub_base_url.clone(),
            ..HubConfig::default()
        });

        let interval = config.renew_interval();
        let service = Arc::new(LicensingService::new(config, vault, verifier, hub));
        let scheduler = Arc::new(RenewalScheduler::new(Arc::clone(&service), interval));

        Ok(Self { service, scheduler })
    }

    /// The licensing service.
    #[must_use]
    pub fn service(&self) -> &Arc<LicensingService> {
        &self.service
    }

    /// The renewal scheduler. Start it after the startup gate passes.
    #[must_use]
    pub fn scheduler(&self) -> &Arc<RenewalScheduler> {
        &self.scheduler
    }

    /// The boot-time license gate.
    #[must_use]
    pub fn startup_gate(&self) -> StartupGate {
        StartupGate::new(Arc::clone(&self.service))
    }

    /// Request guard that defaults enforcement off when unconfigured.
    #[must_use]
    pub fn request_guard(&self) -> RequestGuard {
        RequestGuard::permissive(Arc::clone(&self.service))
    }

    /// Request guard that defaults enforcement on when unconfigured.
    #[must_use]
    pub fn strict_request_guard(&self) -> RequestGuard {
        RequestGuard::strict(Arc::clone(&self.service))
    }

    /// Stops background work. Idempotent; lets an in-flight renewal tick
    /// finish or time out rather than abandoning it mid-write.
    pub async fn shutdown(&self) {
        self.scheduler.stop().await;
    }
}
