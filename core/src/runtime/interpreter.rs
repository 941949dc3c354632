use std::any::type_name;
use std::sync::Arc;
use std::time::Instant;

use futures::future::{join_all, BoxFuture};

use crate::config::ResolvedOptions;
use crate::error::{Failure, RunOutcome};
use crate::log::{blob_tags, elapsed_tag, Level, LogQueue, Tags};
use crate::parse::run_parser;
use crate::task::{Effect, Head, Machine, Task, Value};

use super::traits::{OutputSink, SourceReader};

/// The collaborators a run is wired to.
#[derive(Clone)]
pub struct Collaborators {
    pub reader: Arc<dyn SourceReader>,
    pub sink: Arc<dyn OutputSink>,
}

impl Collaborators {
    pub fn new(reader: impl SourceReader + 'static, sink: impl OutputSink + 'static) -> Self {
        Self {
            reader: Arc::new(reader),
            sink: Arc::new(sink),
        }
    }
}

/// Walks a task description and performs each step.
///
/// Cloning is cheap; every `Distribute` unit gets its own clone.
#[derive(Clone)]
pub struct Interpreter {
    inner: Arc<Inner>,
}

struct Inner {
    options: ResolvedOptions,
    log: LogQueue,
    collaborators: Collaborators,
}

impl Interpreter {
    pub fn new(options: ResolvedOptions, log: LogQueue, collaborators: Collaborators) -> Self {
        Self {
            inner: Arc::new(Inner {
                options,
                log,
                collaborators,
            }),
        }
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.inner.options
    }

    pub async fn log(&self, level: Level, message: impl Into<String>, tags: Tags) {
        self.inner.log.write(level, message, tags).await;
    }

    /// Interpret `task` to its final value or first failure.
    pub fn interpret<T: Send + 'static>(&self, task: Task<T>) -> BoxFuture<'static, RunOutcome<T>> {
        let this = self.clone();
        Box::pin(async move {
            let value = this.drive(task.into_machine()).await?;
            value
                .downcast::<T>()
                .map(|value| *value)
                .map_err(|_| Failure::new(format!("pipeline did not yield a {}", type_name::<T>())))
        })
    }

    /// Alternate between settling queued continuations and performing the
    /// head effect. Iterative: chain length never grows the call stack.
    async fn drive(&self, machine: Machine) -> Result<Value, Failure> {
        let mut machine = machine.settle();
        loop {
            let Machine { head, frames } = machine;
            let effect = match head {
                Head::Pure(value) => return Ok(value),
                Head::Fail(failure) => return Err(failure),
                Head::Effect(effect) => effect,
            };
            let value = self.perform(effect).await?;
            machine = Machine::resumed(value, frames).settle();
        }
    }

    async fn perform(&self, effect: Effect) -> Result<Value, Failure> {
        tracing::trace!(op = effect.name(), "step");
        match effect {
            Effect::ReadInputs { source } => self
                .inner
                .collaborators
                .reader
                .read_blobs(&source)
                .await
                .map(value)
                .map_err(Failure::from_fault),
            Effect::ReadInputPairs { source } => self
                .inner
                .collaborators
                .reader
                .read_blob_pairs(&source)
                .await
                .map(value)
                .map_err(Failure::from_fault),
            Effect::WriteOutput { destination, bytes } => self
                .inner
                .collaborators
                .sink
                .write(&destination, bytes)
                .await
                .map(value)
                .map_err(Failure::from_fault),
            Effect::WriteLog {
                level,
                message,
                tags,
            } => {
                self.log(level, message, tags).await;
                Ok(value(()))
            }
            Effect::Parse { parser, blob } => run_parser(self, &parser, &blob).await.map(value),
            Effect::Annotate { attribute, term } => Ok(value(term.annotate(attribute.as_ref()))),
            Effect::Diff {
                differ,
                blobs,
                terms,
            } => {
                let started = Instant::now();
                let diff = differ.diff(&terms.0, &terms.1);
                let elapsed = started.elapsed();

                let mut tags = Vec::new();
                if let Some(before) = blobs.before() {
                    tags.extend(blob_tags(Some("before"), before));
                }
                if let Some(after) = blobs.after() {
                    tags.extend(blob_tags(Some("after"), after));
                }
                tags.push(elapsed_tag(elapsed));
                self.log(Level::Info, "diff", tags).await;
                Ok(value(diff))
            }
            Effect::Render { render } => Ok(render.apply()),
            Effect::Distribute { group } => group.run(self.clone()).await,
            Effect::RunHostAction { action } => match tokio::task::spawn_blocking(action).await {
                Ok(result) => result.map_err(Failure::from_fault),
                Err(err) => Err(Failure::new(format!("host action panicked: {err}"))),
            },
        }
    }

    /// Run every task on its own tokio task and wait for all of them.
    ///
    /// No unit is cancelled when a sibling fails. Once all have finished, the
    /// failure of the lowest-indexed failing unit wins; otherwise the values
    /// come back in input order.
    pub(crate) async fn distribute<X: Send + 'static>(
        &self,
        tasks: Vec<Task<X>>,
    ) -> Result<Vec<X>, Failure> {
        tracing::debug!(units = tasks.len(), "distribute");
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| tokio::spawn(self.interpret(task)))
            .collect();
        let finished = join_all(handles).await;

        let mut values = Vec::with_capacity(finished.len());
        for (index, outcome) in finished.into_iter().enumerate() {
            match outcome {
                Ok(Ok(value)) => values.push(value),
                Ok(Err(failure)) => return Err(failure),
                Err(err) => {
                    return Err(Failure::new(format!(
                        "distributed unit {index} panicked: {err}"
                    )))
                }
            }
        }
        Ok(values)
    }
}

fn value<V: Send + 'static>(v: V) -> Value {
    Box::new(v)
}
