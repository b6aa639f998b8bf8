//! Client for the report API: tan issuance and tracing-key upload.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use exn_core::TracingKeys;
use exn_report::{DisplayableError, NetworkService, TanResponse, TracingKeysError};

use crate::NetClientError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TanRequestBody<'a> {
    mobile_number: &'a str,
}

#[derive(Debug, Deserialize)]
struct TanResponseBody {
    uuid: String,
}

/// HTTP implementation of [`NetworkService`].
///
/// Use [`ReportApiClient::new`] against the production endpoint or point the
/// base URL at a mock server in tests.
pub struct ReportApiClient {
    client: Client,
    base_url: Url,
}

impl ReportApiClient {
    /// Creates a client for the report API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`NetClientError`] if the underlying `reqwest::Client` cannot
    /// be constructed or `base_url` is not a valid URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, NetClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("exn/0.1 (exposure-notification)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends to the path rather than replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| NetClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

#[async_trait]
impl NetworkService for ReportApiClient {
    async fn request_tan(&self, mobile_number: &str) -> Result<TanResponse, DisplayableError> {
        let url = self.endpoint("request-tan");
        let response = self
            .client
            .post(url)
            .json(&TanRequestBody { mobile_number })
            .send()
            .await
            .map_err(connection_error)?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "report api: tan request refused");
            return Err(DisplayableError {
                title: "Confirmation failed".to_string(),
                description: format!(
                    "The verification service answered with status {}.",
                    response.status()
                ),
            });
        }

        let body: TanResponseBody = response.json().await.map_err(connection_error)?;
        Ok(TanResponse {
            token_id: body.uuid,
        })
    }

    async fn upload_report(&self, keys: &TracingKeys) -> Result<(), TracingKeysError> {
        let url = self.endpoint("publish");
        let response = self
            .client
            .post(url)
            .json(keys)
            .send()
            .await
            .map_err(|e| TracingKeysError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(keys = keys.temporary_exposure_keys.len(), "report api: tracing keys uploaded");
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, "report api: tracing-key upload refused");
        if status == StatusCode::SERVICE_UNAVAILABLE || status.is_server_error() {
            Err(TracingKeysError::Transport(format!("status {status}")))
        } else {
            Err(TracingKeysError::Rejected(format!(
                "status {status}: {detail}"
            )))
        }
    }
}

fn connection_error(e: reqwest::Error) -> DisplayableError {
    DisplayableError {
        title: "No connection".to_string(),
        description: e.to_string(),
    }
}
