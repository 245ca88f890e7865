//! # tillgate-license-client — Typed client for the licensing server
//!
//! The authoritative licensing server is an external collaborator; this
//! crate is the only authorized path to it. Two endpoints are consumed:
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | `/api/v1/license/validate` | Validate a serial against a hardware id |
//! | POST | `/api/v1/license/activate` | Claim an activation slot |
//!
//! Every request carries `{serialNumber, hardwareId, computerInfo}`.
//!
//! ## Error mapping
//!
//! The activation engine treats [`LicenseClientError::Http`],
//! [`LicenseClientError::Api`], and [`LicenseClientError::Deserialization`]
//! as transport-category failures that trigger the offline fallback.
//! [`LicenseClientError::SlotExhausted`] (HTTP 409 from the activate
//! endpoint) is an authoritative refusal and is never downgraded.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigError, LicenseServerConfig};
pub use error::LicenseClientError;
pub use types::{ActivateResponse, ValidateResponse, ValidationRequest};

use std::time::Duration;

/// API path prefix on the licensing server.
const API_PREFIX: &str = "api/v1/license";

/// Client for the remote licensing server.
#[derive(Debug, Clone)]
pub struct LicenseServerClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl LicenseServerClient {
    /// Create a client from configuration. The configured timeout bounds
    /// every request; a timeout surfaces as [`LicenseClientError::Http`].
    pub fn new(config: LicenseServerConfig) -> Result<Self, LicenseClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LicenseClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Validate a serial number against this hardware.
    ///
    /// Calls `POST {base_url}/api/v1/license/validate`. A 2xx response is
    /// decoded into [`ValidateResponse`]; anything else is an error the
    /// caller treats as transport failure.
    pub async fn validate(
        &self,
        request: &ValidationRequest<'_>,
    ) -> Result<ValidateResponse, LicenseClientError> {
        let endpoint = "POST /validate";
        let url = format!("{}{}/validate", self.base_url, API_PREFIX);

        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| LicenseClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LicenseClientError::Api {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| LicenseClientError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })
    }

    /// Claim an activation slot for a validated serial.
    ///
    /// Calls `POST {base_url}/api/v1/license/activate`. A 409 response
    /// means every installation slot is consumed and maps to
    /// [`LicenseClientError::SlotExhausted`].
    pub async fn activate(
        &self,
        request: &ValidationRequest<'_>,
    ) -> Result<ActivateResponse, LicenseClientError> {
        let endpoint = "POST /activate";
        let url = format!("{}{}/activate", self.base_url, API_PREFIX);

        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| LicenseClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::CONFLICT {
            let body = resp.text().await.unwrap_or_default();
            return Err(LicenseClientError::SlotExhausted { body });
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LicenseClientError::Api {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| LicenseClientError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })
    }
}
