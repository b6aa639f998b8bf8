//! The four-step verified-submission state machine.

use std::sync::Arc;

use chrono::NaiveDate;
use exn_core::{DiagnosisType, PersonalData, TracingKeys, Verification};

use crate::error::ReportError;
use crate::services::{KeyCollectionService, NetworkService};

/// Where a report flow currently stands.
///
/// ```text
/// Idle --tan_confirmation--> AwaitingCode --status_report--> Verified --submit--> Submitted
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportFlowState {
    /// Nothing requested yet.
    Idle,
    /// A tan was issued; waiting for the user to enter its confirmation code.
    AwaitingCode { token_id: String },
    /// Token and code are bound; the report may be submitted.
    Verified { verification: Verification },
    /// The report was uploaded. Terminal.
    Submitted,
}

/// Drives one verified health-status report from tan request to upload.
///
/// Each instance owns its state exclusively; the `&mut self` methods encode
/// the single-writer contract, so a caller must not interleave two steps on
/// the same instance. Failed steps leave the state untouched, which makes
/// caller-driven retry safe: a failed `submit` rebuilds the bundle from the
/// still-held [`Verification`].
pub struct ReportFlowController {
    network: Arc<dyn NetworkService>,
    key_store: Arc<dyn KeyCollectionService>,
    state: ReportFlowState,
}

impl ReportFlowController {
    #[must_use]
    pub fn new(network: Arc<dyn NetworkService>, key_store: Arc<dyn KeyCollectionService>) -> Self {
        Self {
            network,
            key_store,
            state: ReportFlowState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ReportFlowState {
        &self.state
    }

    /// Request a one-time authorization token for the user's mobile number.
    ///
    /// On success the flow moves to `AwaitingCode`. On failure the state is
    /// unchanged — no partial token is retained. Once the flow is verified or
    /// submitted this is a no-op, so a stale UI callback cannot reset it.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::TanConfirmation`] with the collaborator's
    /// user-displayable cause.
    pub async fn tan_confirmation(
        &mut self,
        personal_data: &PersonalData,
    ) -> Result<(), ReportError> {
        match self.state {
            ReportFlowState::Idle | ReportFlowState::AwaitingCode { .. } => {}
            ReportFlowState::Verified { .. } | ReportFlowState::Submitted => {
                tracing::debug!("report flow: tan requested after verification, ignoring");
                return Ok(());
            }
        }

        match self.network.request_tan(&personal_data.mobile_number).await {
            Ok(response) => {
                self.state = ReportFlowState::AwaitingCode {
                    token_id: response.token_id,
                };
                Ok(())
            }
            Err(error) => Err(ReportError::TanConfirmation(error)),
        }
    }

    /// Bind the user-entered confirmation code to the held token.
    ///
    /// Moves the flow to `Verified`. Re-binding while already verified
    /// overwrites the verification with the new code, same token. With no
    /// outstanding token this is a silent no-op rather than an error.
    pub fn status_report(&mut self, confirmation_code: &str) {
        let token_id = match &self.state {
            ReportFlowState::AwaitingCode { token_id } => token_id.clone(),
            ReportFlowState::Verified { verification } => verification.token_id.clone(),
            ReportFlowState::Idle | ReportFlowState::Submitted => {
                tracing::debug!("report flow: status report without an outstanding tan, ignoring");
                return;
            }
        };

        self.state = ReportFlowState::Verified {
            verification: Verification {
                token_id,
                confirmation_code: confirmation_code.to_string(),
            },
        };
    }

    /// Collect keys for the inclusive date range and upload the report.
    ///
    /// Requires `Verified`; in any other state this fails immediately with
    /// [`ReportError::Unknown`] and no collaborator is called. Key-collection
    /// failures also surface as [`ReportError::Unknown`] without advancing
    /// the state. Only a successful upload moves the flow to `Submitted`.
    ///
    /// # Errors
    ///
    /// - [`ReportError::Unknown`] when the flow is not verified or key
    ///   collection fails.
    /// - [`ReportError::Submission`] when the upload fails; the verification
    ///   is kept, so re-running `submit` rebuilds the bundle.
    pub async fn submit(
        &mut self,
        from: NaiveDate,
        until_including: NaiveDate,
        diagnosis_type: DiagnosisType,
    ) -> Result<(), ReportError> {
        let ReportFlowState::Verified { verification } = &self.state else {
            return Err(ReportError::Unknown);
        };

        let keys = self
            .key_store
            .collect_keys(from, until_including, diagnosis_type)
            .await
            .map_err(|error| {
                tracing::error!(error = %error, "report flow: key collection failed");
                ReportError::Unknown
            })?;

        let tracing_keys = TracingKeys {
            temporary_exposure_keys: keys,
            diagnosis_type,
            verification_payload: verification.clone(),
        };

        tracing::debug!(diagnosis_type = %diagnosis_type, "report flow: uploading tracing keys");
        match self.network.upload_report(&tracing_keys).await {
            Ok(()) => {
                self.state = ReportFlowState::Submitted;
                Ok(())
            }
            Err(error) => Err(ReportError::Submission(error)),
        }
    }
}
