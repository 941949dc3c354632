#[allow(clippy::module_inception)]
pub mod error;

pub use error::{AssignmentError, Failure, RunOutcome};
