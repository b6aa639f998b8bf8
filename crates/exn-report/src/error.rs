use thiserror::Error;

/// User-displayable failure from the report API.
///
/// The network layer condenses whatever went wrong into a title and
/// description suitable for direct presentation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{title}: {description}")]
pub struct DisplayableError {
    pub title: String,
    pub description: String,
}

/// Failure while uploading assembled tracing keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TracingKeysError {
    /// The endpoint answered and refused the upload.
    #[error("upload rejected: {0}")]
    Rejected(String),

    /// The upload never completed (network, TLS, timeout).
    #[error("upload failed: {0}")]
    Transport(String),
}

/// Failure while collecting exposure keys from the platform key store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("exposure key collection failed: {0}")]
pub struct CollectionError(pub String);

/// The closed error set surfaced by the report flow.
///
/// Key-collection failures deliberately collapse into [`ReportError::Unknown`]
/// rather than exposing the platform cause; the flow controller never retries
/// on its own.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("health-status report failed")]
    Unknown,

    #[error("tan confirmation failed")]
    TanConfirmation(#[source] DisplayableError),

    #[error("report submission failed")]
    Submission(#[source] TracingKeysError),
}
