use uuid::Uuid;

use crate::config::Options;
use crate::error::{Failure, RunOutcome};
use crate::log::{DiagnosticStream, LogSink};
use crate::task::Task;

use super::interpreter::{Collaborators, Interpreter};

/// One pipeline run: options, a diagnostic stream and the collaborators.
pub struct Runner {
    options: Options,
    diagnostics: DiagnosticStream,
    collaborators: Collaborators,
}

impl Runner {
    pub fn new(options: Options, collaborators: Collaborators) -> Self {
        Self {
            options,
            diagnostics: DiagnosticStream::Stderr,
            collaborators,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: DiagnosticStream) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Interpret `task` and return its outcome.
    ///
    /// The log sink is started first and fully drained before this returns,
    /// whatever the outcome. The pipeline runs on its own tokio task, so a
    /// panicking continuation becomes a failure instead of unwinding past
    /// the sink shutdown.
    pub async fn run<T: Send + 'static>(self, task: Task<T>) -> RunOutcome<T> {
        let run_id = Uuid::new_v4();
        let Runner {
            options,
            diagnostics,
            collaborators,
        } = self;

        let resolved = options.resolve(&diagnostics);
        tracing::debug!(%run_id, color = resolved.color, verbosity = ?resolved.verbosity, "run start");

        let sink = LogSink::start(
            diagnostics,
            resolved.color,
            resolved.verbosity,
            resolved.log_channel_capacity,
        )
        .await
        .map_err(|e| Failure::new(format!("cannot open diagnostic stream: {e}")))?;

        let outcome = {
            let interpreter = Interpreter::new(resolved, sink.queue(), collaborators);
            match tokio::spawn(interpreter.interpret(task)).await {
                Ok(outcome) => outcome,
                Err(err) => Err(Failure::new(format!("pipeline panicked: {err}"))),
            }
        };

        if let Err(err) = sink.shutdown().await {
            tracing::warn!(%run_id, error = %err, "log sink terminated with an error");
        }
        tracing::debug!(%run_id, ok = outcome.is_ok(), "run finish");
        outcome
    }
}

/// Run `task` with diagnostics on stderr.
pub async fn run<T: Send + 'static>(
    options: &Options,
    collaborators: Collaborators,
    task: Task<T>,
) -> RunOutcome<T> {
    Runner::new(options.clone(), collaborators).run(task).await
}
