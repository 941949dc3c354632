//! Interpretation of task descriptions.
//!
//! ```text
//! Runner::run(task)
//!   ↓ Options::resolve(diagnostics)
//!   ↓ LogSink::start            (single writer, bounded queue)
//!   ↓ Interpreter::interpret    (one step at a time; Distribute spawns units)
//!   ↓ LogSink::shutdown         (drain, flush, join)
//! RunOutcome<T>
//! ```

mod interpreter;
mod run;
mod traits;

pub use interpreter::{Collaborators, Interpreter};
pub use run::{run, Runner};
pub use traits::{OutputSink, SourceReader};
