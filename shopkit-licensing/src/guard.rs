//! Access decisions derived from license status.
//!
//! Two decision points with deliberately different postures:
//!
//! - The **startup gate** runs once at boot and only refuses to start for
//!   a license that expired long ago (or a state it does not recognize).
//!   Everything else boots, possibly straight into the setup flow.
//! - The **request guard** runs on every protected request and denies any
//!   non-allowed state with a user-facing reason, except that a state it
//!   does not recognize grants the setup/activation surface only.
//!
//! The asymmetry is intentional and load-bearing: an unrecognized state
//! denies at boot but only narrows to the setup surface per request.
//!
//! Guards hold no state of their own; they read the service's status API
//! and apply policy.

use crate::service::LicensingService;
use crate::status::{LicenseState, LicenseStatus};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Multiplier on the configured grace days for the startup gate's extended
/// window. A policy knob owned by product: twice the offline grace keeps an
/// expired install able to reach the renewal flow for a while before boot
/// is refused outright.
pub const STARTUP_GRACE_FACTOR: u32 = 2;

/// Outcome of the boot-time license check.
#[derive(Debug, Clone)]
pub struct StartupDecision {
    /// Whether the application may start.
    pub can_start: bool,
    /// The state behind the decision.
    pub status: LicenseState,
    /// User-facing explanation.
    pub message: String,
    /// The setup/activation flow should be presented.
    pub requires_setup: bool,
    /// A warning should be shown (e.g. running on grace).
    pub show_warning: bool,
}

impl StartupDecision {
    /// Applies the startup policy to a resolved status.
    ///
    /// `grace_days` is the configured offline grace; the extended window
    /// that finally refuses boot is [`STARTUP_GRACE_FACTOR`] times it,
    /// counted from expiry.
    #[must_use]
    pub fn from_status(status: &LicenseStatus, grace_days: u32, now: DateTime<Utc>) -> Self {
        match status.state {
            LicenseState::Development | LicenseState::Active => Self::allow(status, false, false),
            LicenseState::OfflineGrace => Self::allow(status, false, true),
            LicenseState::NotRegistered | LicenseState::NotLicensed => {
                Self::allow(status, true, false)
            }
            LicenseState::Error => Self::allow(status, false, true),
            LicenseState::Expired => {
                let extended = Duration::days(i64::from(STARTUP_GRACE_FACTOR * grace_days));
                let within_extended = status
                    .expires_at
                    .map(|exp| now <= exp + extended)
                    .unwrap_or(false);

                if within_extended {
                    Self::allow(status, true, true)
                } else {
                    Self {
                        can_start: false,
                        status: status.state,
                        message:
                            "The license expired beyond the grace period. Renew it to start the application."
                                .to_string(),
                        requires_setup: true,
                        show_warning: true,
                    }
                }
            }
            other => {
                warn!(?other, "unrecognized license state at startup, refusing to start");
                Self {
                    can_start: false,
                    status: other,
                    message: "License status could not be determined.".to_string(),
                    requires_setup: true,
                    show_warning: true,
                }
            }
        }
    }

    fn allow(status: &LicenseStatus, requires_setup: bool, show_warning: bool) -> Self {
        Self {
            can_start: true,
            status: status.state,
            message: status.message.clone(),
            requires_setup: requires_setup || status.needs_setup,
            show_warning: show_warning || status.show_warning,
        }
    }
}

/// Authorization failure raised by the request guard.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AccessDenied {
    /// The state that caused the denial.
    pub status: LicenseState,
    /// User-facing reason, derived from the state.
    pub message: String,
}

/// Level of access granted by the request guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Full access to protected requests.
    Granted,
    /// Only the setup/activation surface may be reached.
    SetupOnly,
}

impl Access {
    /// Applies the per-request policy to a resolved status.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] with a state-derived message for every
    /// non-allowed state the policy recognizes.
    pub fn from_status(status: &LicenseStatus) -> Result<Self, AccessDenied> {
        match status.state {
            LicenseState::Active | LicenseState::OfflineGrace | LicenseState::Development => {
                Ok(Access::Granted)
            }
            LicenseState::NotRegistered => Err(AccessDenied::new(
                status.state,
                "This installation is not registered. Register it before using the application.",
            )),
            LicenseState::NotLicensed => Err(AccessDenied::new(
                status.state,
                "No license is active for this installation. Purchase a license to continue.",
            )),
            LicenseState::Expired => Err(AccessDenied::new(
                status.state,
                "Your license has expired. Renew your license to continue.",
            )),
            LicenseState::Error => Err(AccessDenied::new(
                status.state,
                "License status could not be determined. Try again shortly.",
            )),
            other => {
                warn!(?other, "unrecognized license state, limiting to setup surface");
                Ok(Access::SetupOnly)
            }
        }
    }
}

impl AccessDenied {
    fn new(status: LicenseState, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

/// Boot-time license gate. Evaluated once by the process bootstrap.
pub struct StartupGate {
    service: Arc<LicensingService>,
}

impl StartupGate {
    #[must_use]
    pub fn new(service: Arc<LicensingService>) -> Self {
        Self { service }
    }

    /// Computes the boot decision from local state.
    #[must_use]
    pub fn evaluate(&self) -> StartupDecision {
        let now = Utc::now();
        let status = self.service.resolve_local(now);
        let grace_days = self.service.config().offline_grace_days;
        StartupDecision::from_status(&status, grace_days, now)
    }
}

/// Per-request license guard.
///
/// Comes in two variants that differ only in what an *unconfigured*
/// `LICENSING_ENFORCED` means: the permissive guard treats it as off, the
/// strict guard as on. Explicit configuration always wins.
pub struct RequestGuard {
    service: Arc<LicensingService>,
    default_enforced: bool,
}

impl RequestGuard {
    /// Guard that defaults enforcement off when unconfigured.
    #[must_use]
    pub fn permissive(service: Arc<LicensingService>) -> Self {
        Self {
            service,
            default_enforced: false,
        }
    }

    /// Guard that defaults enforcement on when unconfigured.
    #[must_use]
    pub fn strict(service: Arc<LicensingService>) -> Self {
        Self {
            service,
            default_enforced: true,
        }
    }

    /// Decides whether the current request may proceed.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] for every non-allowed state the policy
    /// recognizes.
    pub fn check(&self) -> Result<Access, AccessDenied> {
        let enforced = self
            .service
            .config()
            .enforced
            .unwrap_or(self.default_enforced);
        if !enforced {
            return Ok(Access::Granted);
        }

        let status = self.service.resolve_local(Utc::now());
        Access::from_status(&status)
    }
}
