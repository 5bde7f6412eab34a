//! HTTP client for the Hub activation API.

use crate::error::{HubError, HubResult};
use crate::protocol::{ActivateRequest, ActivateResponse, ErrorBody};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Configuration for the Hub client.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Base URL of the Hub, e.g. `http://localhost:3000`.
    pub base_url: String,
    /// Timeout applied to every request. There is no retry inside a call.
    pub timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the Hub licensing API.
pub struct HubClient {
    config: HubConfig,
    client: reqwest::Client,
}

impl HubClient {
    /// Creates a client with the request timeout baked in.
    #[must_use]
    pub fn new(config: HubConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to create HTTP client");
        Self { config, client }
    }

    /// Requests activation (or renewal) of a license for a device.
    ///
    /// # Errors
    ///
    /// HTTP 404 and 400 map to [`HubError::LicenseNotFound`] and
    /// [`HubError::InvalidParameters`]; transport failures map to
    /// [`HubError::Network`].
    pub async fn activate(&self, request: &ActivateRequest) -> HubResult<ActivateResponse> {
        let url = format!(
            "{}/licenses/activate",
            self.config.base_url.trim_end_matches('/')
        );
        debug!(tenant = %request.tenant_id, device = %request.device_id, "requesting activation from Hub");

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            return serde_json::from_str::<ActivateResponse>(&body)
                .map_err(|e| HubError::MalformedResponse(e.to_string()));
        }

        let message = Self::error_message(response).await;
        match status {
            StatusCode::NOT_FOUND => Err(HubError::LicenseNotFound(message)),
            StatusCode::BAD_REQUEST => Err(HubError::InvalidParameters(message)),
            _ => Err(HubError::Api {
                status: status.as_u16(),
                message,
            }),
        }
    }

    /// Extracts a human-readable message from an error response body.
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            })
    }
}
