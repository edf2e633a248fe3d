//! Book entry form and the badge mint submission workflow.

mod error;
mod finished_at;
mod form;
mod workflow;

pub use error::MintError;
pub use finished_at::{FinishedAtError, finished_at_from_local_date, finished_at_in};
pub use form::{Draft, FormField, FormState};
pub use workflow::{SubmissionPhase, SubmissionWorkflow, SubmitReceipt, build_call};
