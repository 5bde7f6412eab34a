//! The decoded license token payload.

use crate::error::{TokenError, TokenResult};
use chrono::serde::ts_seconds;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shopkit_types::{DeviceId, TenantId};
use std::collections::BTreeSet;

/// The claims carried by a verified license token.
///
/// Claims are created only by the Hub; the client decodes them and never
/// mutates them. Decoding is strict: unknown fields and missing required
/// fields are rejected, so a partially-populated value cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Claims {
    /// The tenant the license is bound to.
    pub tenant_id: TenantId,
    /// The device the license was activated on.
    pub device_id: DeviceId,
    /// The plan name, as the Hub defines plans.
    pub plan: String,
    /// Named capabilities this license grants.
    pub entitlements: BTreeSet<String>,
    /// When the token was issued.
    #[serde(rename = "iat", with = "ts_seconds")]
    pub issued_at: DateTime<Utc>,
    /// When the license expires.
    #[serde(rename = "exp", with = "ts_seconds")]
    pub expires_at: DateTime<Utc>,
    /// Days after expiry during which the license is still honored offline.
    pub grace_days: u32,
    /// The authority that issued the token.
    #[serde(rename = "iss")]
    pub issuer: String,
}

impl Claims {
    /// Checks the structural invariants the Hub guarantees.
    ///
    /// # Errors
    ///
    /// Returns an error if `expires_at` is not after `issued_at`.
    pub fn validate(&self) -> TokenResult<()> {
        if self.expires_at <= self.issued_at {
            return Err(TokenError::InvalidPayload(format!(
                "expiry {} is not after issuance {}",
                self.expires_at, self.issued_at
            )));
        }
        Ok(())
    }

    /// Returns true if the license grants the named capability.
    #[must_use]
    pub fn has_entitlement(&self, name: &str) -> bool {
        self.entitlements.contains(name)
    }

    /// Returns the grace window length in whole seconds.
    #[must_use]
    pub fn grace_seconds(&self) -> i64 {
        i64::from(self.grace_days) * 86_400
    }

    /// Returns the instant the offline grace window ends.
    #[must_use]
    pub fn grace_ends_at(&self) -> DateTime<Utc> {
        self.expires_at + Duration::seconds(self.grace_seconds())
    }
}
