//! License validation, renewal and enforcement for ShopKit.
//!
//! This crate answers whether the installation is entitled to run, at
//! startup and on every protected request, without needing the Hub to be
//! reachable each time. It composes:
//!
//! - the credential vault (`shopkit-vault`) for the stored token,
//! - the token verifier (`shopkit-token`) for signature and claims,
//! - the Hub client (`shopkit-hub`) for activation and renewal,
//!
//! into a status API, a background renewal scheduler, and the two access
//! gates the application consumes. Build a [`LicensingContext`] once at
//! process start and pass it where it is needed.
//!
//! # Status model
//!
//! A license is classified from its claims and the current time: active
//! until expiry, then honored through an offline grace window, then
//! expired. Enforcement can be disabled entirely for development. The
//! classification is pure ([`resolve_status`]); everything stateful lives
//! in [`LicensingService`].

mod config;
mod context;
mod device;
mod error;
mod guard;
mod renewal;
mod service;
mod status;

pub use config::LicensingConfig;
pub use context::LicensingContext;
pub use device::fallback_device_id;
pub use error::{LicensingError, LicensingResult};
pub use guard::{
    Access, AccessDenied, RequestGuard, StartupDecision, StartupGate, STARTUP_GRACE_FACTOR,
};
pub use renewal::{RenewalScheduler, RenewalState, RENEWAL_THRESHOLD_SECS};
pub use service::{Activation, InstallStatus, LicensingService};
pub use status::{resolve_status, LicenseState, LicenseStatus};
