//! Shared types for the ShopKit licensing core.
//!
//! Every licensing crate speaks in terms of a tenant (the customer the
//! license is bound to) and a device (the installation). Both identifiers
//! are opaque strings issued by the Hub; this crate gives them distinct
//! types so they cannot be swapped at a call site. The classified
//! [`LicenseState`] lives here too, so access deciders consume it as a
//! foreign, non-exhaustive enum and are forced to handle states they do
//! not recognize.

mod ids;
mod license;

pub use ids::{DeviceId, IdError, TenantId};
pub use license::LicenseState;
