use std::ops::Range;

use thiserror::Error;

/// The opaque failure text a run ends with.
///
/// `Display` prints the message verbatim so the process surface can echo it
/// to the diagnostic stream without decoration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Failure {
    message: String,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Convert a collaborator fault into a failure, keeping the full cause chain.
    pub fn from_fault(fault: anyhow::Error) -> Self {
        Self::new(format!("{fault:#}"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Raised by an assignment pass that cannot turn a raw tree into a typed term.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssignmentError {
    pub message: String,
    /// Byte range of the offending source, when the assignment knows it.
    pub range: Option<Range<usize>>,
}

impl AssignmentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            range: None,
        }
    }

    pub fn at(message: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            message: message.into(),
            range: Some(range),
        }
    }
}

/// Result of interpreting a full task description.
pub type RunOutcome<T> = Result<T, Failure>;
