//! The clone pipeline.
//!
//! [`clone_one`] handles exactly one issue (validate, create with retries,
//! synthesize the target record); [`CloneOrchestrator`] drives a whole
//! selection through it sequentially, maintains live progress, writes
//! history incrementally and reconciles issue links at the end.

mod error;
mod orchestrator;
mod outcome;
mod report;
mod single;

pub use error::{CloneError, RunError};
pub use orchestrator::{CloneOrchestrator, CloneRequest};
pub use outcome::{CloneOutcome, CloneResult, ProgressEvent};
pub use report::CloneReport;
pub use single::{clone_one, create_retry_options};
