//! Execution core of the semflow analysis pipeline.
//!
//! Pipelines are described as [`task::Task`] values and handed to a
//! [`runtime::Runner`], which interprets them with a single log-sink worker
//! and concurrent fan-out for `Distribute` groups. Parsing engines, diffing
//! and rendering are injected; see [`parse`], [`diff::Differ`] and
//! [`runtime::SourceReader`] / [`runtime::OutputSink`].

pub mod blob;
pub mod config;
pub mod diff;
pub mod error;
pub mod log;
pub mod parse;
pub mod runtime;
pub mod task;
pub mod term;

pub use blob::{Blob, BlobPair, Destination, FileSpec, Language, Pair, PairSource, Source};
pub use error::{AssignmentError, Failure, RunOutcome};
pub use runtime::{Collaborators, Runner};
pub use task::Task;
