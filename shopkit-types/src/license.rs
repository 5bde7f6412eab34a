//! The classified license state shared across the licensing crates.

use serde::{Deserialize, Serialize};

/// The classified state of an installation's license.
///
/// Marked non-exhaustive so states can be added without breaking
/// consumers; deciders must treat states they do not recognize according
/// to their own posture (the gates deny or restrict, never silently
/// allow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum LicenseState {
    /// No tenant/device identity is configured yet.
    NotRegistered,
    /// Identity is configured but no usable credential is stored.
    NotLicensed,
    /// The license is within its validity window.
    Active,
    /// The license expired but the offline grace window still covers it.
    OfflineGrace,
    /// The license expired and the grace window has elapsed.
    Expired,
    /// Status could not be determined.
    Error,
    /// Enforcement is disabled; everything is allowed.
    Development,
}

impl LicenseState {
    /// True for the states that permit normal use of the application.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(
            self,
            LicenseState::Active | LicenseState::OfflineGrace | LicenseState::Development
        )
    }
}
