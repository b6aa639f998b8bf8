//! HTTP implementations of the network collaborators.
//!
//! [`ReportApiClient`] talks to the report API (tan issuance, tracing-key
//! upload); [`BatchDownloadClient`] pulls exposure-key batches from the CDN
//! with cooperative cancellation. Both take a custom base URL so tests can
//! point them at a wiremock server.

mod batch;
mod client;

pub use batch::BatchDownloadClient;
pub use client::ReportApiClient;

use thiserror::Error;

/// Errors from constructing an HTTP client.
#[derive(Debug, Error)]
pub enum NetClientError {
    /// The underlying `reqwest::Client` could not be built.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL does not parse.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
