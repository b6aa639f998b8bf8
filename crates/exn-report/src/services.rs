//! Collaborator contracts consumed by the report flow.

use async_trait::async_trait;
use chrono::NaiveDate;
use exn_core::{DiagnosisType, TemporaryExposureKey, TracingKeys};

use crate::error::{CollectionError, DisplayableError, TracingKeysError};

/// Response to a tan request: the token id the user's confirmation code is
/// later bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TanResponse {
    pub token_id: String,
}

/// Report-API collaborator: issues tans and accepts key uploads.
#[async_trait]
pub trait NetworkService: Send + Sync {
    /// Request a one-time authorization token for `mobile_number`.
    ///
    /// # Errors
    ///
    /// Returns a [`DisplayableError`] ready for user presentation.
    async fn request_tan(&self, mobile_number: &str) -> Result<TanResponse, DisplayableError>;

    /// Upload an assembled tracing-keys bundle.
    ///
    /// # Errors
    ///
    /// Returns [`TracingKeysError`] when the endpoint refuses the bundle or
    /// the transfer fails.
    async fn upload_report(&self, keys: &TracingKeys) -> Result<(), TracingKeysError>;
}

/// Platform key-store collaborator.
#[async_trait]
pub trait KeyCollectionService: Send + Sync {
    /// Collect the locally held exposure keys for the inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError`] when the platform refuses or fails.
    async fn collect_keys(
        &self,
        from: NaiveDate,
        until_including: NaiveDate,
        diagnosis_type: DiagnosisType,
    ) -> Result<Vec<TemporaryExposureKey>, CollectionError>;
}
