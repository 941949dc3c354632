//! Inert, composable pipeline descriptions.
//!
//! A [`Task`] is a value: building one, or chaining it with [`Task::and_then`],
//! never reads a file, touches the log queue, spawns anything or calls a
//! continuation. A task is a head step plus a queue of continuations waiting
//! on it. The head is either a finished value, a failure, or an [`Effect`]
//! whose operands are open for inspection. Binding pushes one frame onto the
//! queue, so chains of any length build in constant time per step and run
//! without recursion. The interpreter in [`crate::runtime`] is the only thing
//! that performs effects.
//!
//! ```text
//! read_blobs(src)
//!   .and_then(|blobs| distribute_map(blobs, |b| parse(p.clone(), b)))
//!   .and_then(|terms| write(dst, render(..)))
//! ```

mod fanout;
mod frames;
mod render;

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use bytes::Bytes;

use crate::blob::{Blob, BlobPair, Destination, PairSource, Source};
use crate::diff::Differ;
use crate::error::Failure;
use crate::log::{Level, Tags};
use crate::parse::Parser;
use crate::term::{Attribute, Term};

pub use fanout::Fanout;
pub use render::Rendering;

pub(crate) use frames::Frames;

/// A step's result with its type erased; continuations downcast it back.
pub type Value = Box<dyn Any + Send>;

/// Host code run by [`host`], already wrapped to produce an erased value.
pub type HostAction = Box<dyn FnOnce() -> anyhow::Result<Value> + Send>;

/// The closed set of steps a pipeline can request.
///
/// Each variant's result type is fixed: reads yield `Vec<Blob>` /
/// `Vec<BlobPair>`, writes and logs yield `()`, parse and annotate yield a
/// [`Term`], diff yields a [`crate::diff::Diff`], and render, distribute and
/// host actions yield whatever their typed constructor promised.
pub enum Effect {
    ReadInputs {
        source: Source,
    },
    ReadInputPairs {
        source: PairSource,
    },
    WriteOutput {
        destination: Destination,
        bytes: Bytes,
    },
    WriteLog {
        level: Level,
        message: String,
        tags: Tags,
    },
    Parse {
        parser: Parser,
        blob: Blob,
    },
    Annotate {
        attribute: Arc<dyn Attribute>,
        term: Term,
    },
    Diff {
        differ: Arc<dyn Differ>,
        blobs: BlobPair,
        terms: (Term, Term),
    },
    /// A total render function and the value it will be applied to.
    Render {
        render: Box<dyn Rendering>,
    },
    Distribute {
        group: Box<dyn Fanout>,
    },
    RunHostAction {
        action: HostAction,
    },
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadInputs { .. } => "read_inputs",
            Self::ReadInputPairs { .. } => "read_input_pairs",
            Self::WriteOutput { .. } => "write_output",
            Self::WriteLog { .. } => "write_log",
            Self::Parse { .. } => "parse",
            Self::Annotate { .. } => "annotate",
            Self::Diff { .. } => "diff",
            Self::Render { .. } => "render",
            Self::Distribute { .. } => "distribute",
            Self::RunHostAction { .. } => "run_host_action",
        }
    }
}

pub(crate) enum Head {
    Pure(Value),
    Fail(Failure),
    Effect(Effect),
}

/// An untyped task: the form the interpreter and the continuation queue
/// work with.
pub(crate) struct Machine {
    pub(crate) head: Head,
    pub(crate) frames: Frames,
}

impl Machine {
    fn new(head: Head) -> Self {
        Self {
            head,
            frames: Frames::default(),
        }
    }

    pub(crate) fn resumed(value: Value, frames: Frames) -> Self {
        Self {
            head: Head::Pure(value),
            frames,
        }
    }

    /// Feed a finished head through queued continuations until the head is
    /// an effect, a failure, or a value with nothing left waiting on it.
    pub(crate) fn settle(self) -> Self {
        let Machine {
            mut head,
            mut frames,
        } = self;
        loop {
            match head {
                Head::Pure(value) => match frames.pop_front() {
                    Some(frame) => {
                        let next = frame(value);
                        frames.stack_on(next.frames);
                        head = next.head;
                    }
                    None => {
                        return Machine {
                            head: Head::Pure(value),
                            frames,
                        }
                    }
                },
                other => return Machine { head: other, frames },
            }
        }
    }
}

pub struct Task<T> {
    machine: Machine,
    _out: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> Task<T> {
    fn from_machine(machine: Machine) -> Self {
        Self {
            machine,
            _out: PhantomData,
        }
    }

    fn suspend(effect: Effect) -> Self {
        Self::from_machine(Machine::new(Head::Effect(effect)))
    }

    pub fn pure(value: T) -> Self {
        Self::from_machine(Machine::new(Head::Pure(Box::new(value))))
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::failed(Failure::new(message))
    }

    pub fn failed(failure: Failure) -> Self {
        Self::from_machine(Machine::new(Head::Fail(failure)))
    }

    /// Sequence: feed this task's result into `f`. Queues `f` without
    /// calling it.
    pub fn and_then<U, F>(self, f: F) -> Task<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Task<U> + Send + 'static,
    {
        let mut machine = self.machine;
        machine
            .frames
            .push_back(Box::new(move |value: Value| match value.downcast::<T>() {
                Ok(value) => f(*value).machine,
                Err(_) => Machine::new(Head::Fail(type_mismatch::<T>())),
            }));
        Task::from_machine(machine)
    }

    pub fn map<U, F>(self, f: F) -> Task<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.and_then(move |value| Task::pure(f(value)))
    }

    /// Run `next` after this task, discarding this task's value.
    pub fn then<U: Send + 'static>(self, next: Task<U>) -> Task<U> {
        self.and_then(move |_| next)
    }

    /// Name of the head step, or `None` when the head is a value or failure.
    pub fn operation(&self) -> Option<&'static str> {
        self.effect().map(Effect::name)
    }

    /// The head step and its operands.
    pub fn effect(&self) -> Option<&Effect> {
        match &self.machine.head {
            Head::Effect(effect) => Some(effect),
            Head::Pure(_) | Head::Fail(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match &self.machine.head {
            Head::Fail(failure) => Some(failure),
            Head::Pure(_) | Head::Effect(_) => None,
        }
    }

    /// Number of continuations queued behind the head step.
    pub fn pending(&self) -> usize {
        self.machine.frames.len()
    }

    /// Apply queued continuations to a finished head, stopping at the next
    /// effect. Runs pipeline-construction code only; performs no effect.
    pub fn settle(self) -> Self {
        Self::from_machine(self.machine.settle())
    }

    /// Stand `result` in for the head step and settle, exposing the step
    /// that comes after it. A result of the wrong type fails the task.
    pub fn resume<A: Send + 'static>(self, result: A) -> Self {
        let Machine { frames, .. } = self.machine;
        Self::from_machine(Machine::resumed(Box::new(result), frames).settle())
    }

    /// The final value, if the head is a value with nothing queued behind it.
    pub fn into_value(self) -> Option<T> {
        match self.machine.head {
            Head::Pure(value) if self.machine.frames.is_empty() => {
                value.downcast::<T>().ok().map(|value| *value)
            }
            _ => None,
        }
    }

    pub(crate) fn into_machine(self) -> Machine {
        self.machine
    }
}

fn type_mismatch<T>() -> Failure {
    Failure::new(format!(
        "continuation expected a value of type {}",
        type_name::<T>()
    ))
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.machine.head {
            Head::Pure(_) => f.write_str("Pure(..)"),
            Head::Fail(failure) => f.debug_tuple("Fail").field(failure).finish(),
            Head::Effect(effect) => write!(f, "Effect({})", effect.name()),
        }
    }
}

pub fn read_blobs(source: Source) -> Task<Vec<Blob>> {
    Task::suspend(Effect::ReadInputs { source })
}

pub fn read_blob_pairs(source: PairSource) -> Task<Vec<BlobPair>> {
    Task::suspend(Effect::ReadInputPairs { source })
}

pub fn write(destination: Destination, bytes: impl Into<Bytes>) -> Task<()> {
    Task::suspend(Effect::WriteOutput {
        destination,
        bytes: bytes.into(),
    })
}

pub fn log(level: Level, message: impl Into<String>, tags: Tags) -> Task<()> {
    Task::suspend(Effect::WriteLog {
        level,
        message: message.into(),
        tags,
    })
}

pub fn parse(parser: Parser, blob: Blob) -> Task<Term> {
    Task::suspend(Effect::Parse { parser, blob })
}

pub fn annotate(attribute: impl Attribute + 'static, term: Term) -> Task<Term> {
    Task::suspend(Effect::Annotate {
        attribute: Arc::new(attribute),
        term,
    })
}

pub fn diff(differ: Arc<dyn Differ>, blobs: BlobPair, terms: (Term, Term)) -> Task<crate::diff::Diff> {
    Task::suspend(Effect::Diff {
        differ,
        blobs,
        terms,
    })
}

pub fn render<V, R, F>(renderer: F, value: V) -> Task<R>
where
    V: Send + 'static,
    R: Send + 'static,
    F: FnOnce(&V) -> R + Send + 'static,
{
    Task::suspend(Effect::Render {
        render: render::deferred(renderer, value),
    })
}

/// Run every task concurrently; results come back in input order.
pub fn distribute<X: Send + 'static>(tasks: Vec<Task<X>>) -> Task<Vec<X>> {
    Task::suspend(Effect::Distribute {
        group: fanout::group(tasks),
    })
}

pub fn distribute_map<A, X, F>(items: impl IntoIterator<Item = A>, f: F) -> Task<Vec<X>>
where
    X: Send + 'static,
    F: FnMut(A) -> Task<X>,
{
    distribute(items.into_iter().map(f).collect())
}

/// Run arbitrary host code; an error it returns ends the run.
pub fn host<R, F>(action: F) -> Task<R>
where
    R: Send + 'static,
    F: FnOnce() -> anyhow::Result<R> + Send + 'static,
{
    Task::suspend(Effect::RunHostAction {
        action: Box::new(move || action().map(|value| Box::new(value) as Value)),
    })
}
