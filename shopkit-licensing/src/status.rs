//! License status classification.
//!
//! `resolve_status` is a pure function of (enforcement, claims, now).
//! Keeping it free of I/O makes the transitions from active through
//! offline grace to expired testable without a vault, a Hub, or a clock
//! stub.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopkit_token::Claims;
pub use shopkit_types::LicenseState;

/// A derived license status. Never persisted; recomputed from the stored
/// credential and the current time on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseStatus {
    /// The classified state.
    pub state: LicenseState,
    /// Whether the license currently permits use.
    pub valid: bool,
    /// True when this answer came from local state alone; false when a
    /// Hub round-trip produced it.
    pub cached: bool,
    /// User-facing explanation of the state.
    pub message: String,
    /// The licensed plan, when known.
    pub plan: Option<String>,
    /// When the license expires, when known.
    pub expires_at: Option<DateTime<Utc>>,
    /// The installation needs the setup/activation flow.
    pub needs_setup: bool,
    /// The UI should warn the user (e.g. running on grace).
    pub show_warning: bool,
}

impl LicenseStatus {
    fn new(state: LicenseState, valid: bool, message: impl Into<String>) -> Self {
        Self {
            state,
            valid,
            cached: true,
            message: message.into(),
            plan: None,
            expires_at: None,
            needs_setup: false,
            show_warning: false,
        }
    }

    pub(crate) fn development() -> Self {
        Self::new(
            LicenseState::Development,
            true,
            "License enforcement is disabled.",
        )
    }

    pub(crate) fn not_registered() -> Self {
        let mut status = Self::new(
            LicenseState::NotRegistered,
            false,
            "This installation is not registered. Complete setup to continue.",
        );
        status.needs_setup = true;
        status
    }

    pub(crate) fn not_licensed() -> Self {
        let mut status = Self::new(
            LicenseState::NotLicensed,
            false,
            "No license is stored for this installation. Activate one to continue.",
        );
        status.needs_setup = true;
        status
    }

    /// A status for failures outside the classification rules, e.g. when
    /// the consuming layer could not reach the licensing service at all.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LicenseState::Error, false, message)
    }

    /// Days until expiry, negative once expired. `None` without a known
    /// expiry.
    #[must_use]
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at.map(|exp| (exp - now).num_days())
    }
}

/// Classifies the license from enforcement, claims and the current time.
///
/// The rules, in order:
/// 1. enforcement off → `Development`, valid.
/// 2. no claims → `NotLicensed`, needs setup.
/// 3. `now <= expires_at` → `Active`, valid.
/// 4. `expires_at < now <= expires_at + grace` → `OfflineGrace`, valid,
///    with a warning.
/// 5. past the grace window → `Expired`, needs setup.
#[must_use]
pub fn resolve_status(
    enforced: bool,
    claims: Option<&Claims>,
    now: DateTime<Utc>,
) -> LicenseStatus {
    if !enforced {
        return LicenseStatus::development();
    }

    let Some(claims) = claims else {
        return LicenseStatus::not_licensed();
    };

    let mut status = if now <= claims.expires_at {
        LicenseStatus::new(LicenseState::Active, true, "License active.")
    } else if now <= claims.grace_ends_at() {
        let mut status = LicenseStatus::new(
            LicenseState::OfflineGrace,
            true,
            format!(
                "License expired; operating in the offline grace window until {}.",
                claims.grace_ends_at().format("%Y-%m-%d")
            ),
        );
        status.show_warning = true;
        status
    } else {
        let mut status = LicenseStatus::new(
            LicenseState::Expired,
            false,
            "License expired and the grace period has elapsed. Renew to continue.",
        );
        status.needs_setup = true;
        status
    };

    status.plan = Some(claims.plan.clone());
    status.expires_at = Some(claims.expires_at);
    status
}
