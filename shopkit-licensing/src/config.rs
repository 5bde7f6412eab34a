//! Configuration for the licensing core.

use shopkit_types::{DeviceId, TenantId};
use std::env;
use std::time::Duration;
use tracing::warn;

/// Configuration for the licensing core.
///
/// Built from the environment in deployments ([`LicensingConfig::from_env`])
/// or constructed directly by tests and embedders.
#[derive(Debug, Clone)]
pub struct LicensingConfig {
    /// Base URL of the licensing Hub.
    pub hub_base_url: String,
    /// Whether license enforcement is on. `None` means the deployment did
    /// not say; each consumer applies its own default (the service and the
    /// startup gate fail closed, the permissive request guard does not).
    pub enforced: Option<bool>,
    /// Days a license stays honored after expiry without reaching the Hub.
    pub offline_grace_days: u32,
    /// Hours between renewal scheduler ticks.
    pub renew_interval_hours: u64,
    /// PEM-encoded Ed25519 public key for token verification. Absent means
    /// tokens are decoded without signature checking.
    pub public_key_pem: Option<String>,
    /// The tenant this installation belongs to.
    pub tenant_id: Option<TenantId>,
    /// This installation's device identity. When unset, a stable identifier
    /// is derived from the machine.
    pub device_id: Option<DeviceId>,
}

impl Default for LicensingConfig {
    fn default() -> Self {
        Self {
            hub_base_url: "http://localhost:3000".to_string(),
            enforced: None,
            offline_grace_days: 7,
            renew_interval_hours: 6,
            public_key_pem: None,
            tenant_id: None,
            device_id: None,
        }
    }
}

impl LicensingConfig {
    /// Reads configuration from the process environment.
    ///
    /// Unparseable numeric values fall back to their defaults with a
    /// warning rather than aborting startup.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            hub_base_url: env::var("HUB_BASE_URL").unwrap_or(defaults.hub_base_url),
            enforced: env_bool("LICENSING_ENFORCED"),
            offline_grace_days: env_parse("OFFLINE_GRACE_DAYS", defaults.offline_grace_days),
            renew_interval_hours: env_parse("RENEW_INTERVAL_HOURS", defaults.renew_interval_hours),
            public_key_pem: env::var("LICENSE_PUBLIC_KEY_PEM").ok().filter(|s| !s.trim().is_empty()),
            tenant_id: env::var("TENANT_ID").ok().and_then(|s| TenantId::new(s).ok()),
            device_id: env::var("DEVICE_ID").ok().and_then(|s| DeviceId::new(s).ok()),
        }
    }

    /// Returns the renewal tick interval as a duration.
    #[must_use]
    pub fn renew_interval(&self) -> Duration {
        Duration::from_secs(self.renew_interval_hours * 3_600)
    }
}

/// Parses a boolean environment variable, returning `None` when unset or
/// unrecognized.
fn env_bool(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!("unrecognized boolean for {name}: {other:?}, ignoring");
            None
        }
    }
}

/// Parses a numeric environment variable with a fallback default.
fn env_parse<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("unparseable value for {name}: {value:?}, using default");
            default
        }),
        Err(_) => default,
    }
}
