//! Wire types for the Hub activation API.

use serde::{Deserialize, Serialize};
use shopkit_types::{DeviceId, TenantId};

/// Body of `POST /licenses/activate`.
///
/// `license_key` is present on first activation (the user-entered key) and
/// omitted on renewal, where the Hub identifies the license by tenant and
/// device alone.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateRequest {
    pub tenant_id: TenantId,
    pub device_id: DeviceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,
}

/// Successful activation response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateResponse {
    /// The freshly signed license token.
    pub license_token: String,
}

/// Error body the Hub attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}
