//! Verified health-status report workflow.
//!
//! [`ReportFlowController`] walks the four-step submission sequence — obtain
//! a tan, bind the user's confirmation code, collect exposure keys, upload —
//! with an explicit state machine gating each step.

mod error;
mod flow;
mod services;

pub use error::{CollectionError, DisplayableError, ReportError, TracingKeysError};
pub use flow::{ReportFlowController, ReportFlowState};
pub use services::{KeyCollectionService, NetworkService, TanResponse};
