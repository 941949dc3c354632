use futures::future::BoxFuture;

use crate::error::Failure;
use crate::runtime::Interpreter;

use super::{Task, Value};

/// A `Distribute` group with its element type erased.
///
/// Running it interprets every member concurrently and yields the ordered
/// results as one erased `Vec`.
pub trait Fanout: Send {
    /// Number of member tasks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Head step of each member, in order.
    fn operations(&self) -> Vec<Option<&'static str>>;

    fn run(self: Box<Self>, interpreter: Interpreter) -> BoxFuture<'static, Result<Value, Failure>>;
}

struct Group<X> {
    tasks: Vec<Task<X>>,
}

impl<X: Send + 'static> Fanout for Group<X> {
    fn len(&self) -> usize {
        self.tasks.len()
    }

    fn operations(&self) -> Vec<Option<&'static str>> {
        self.tasks.iter().map(Task::operation).collect()
    }

    fn run(self: Box<Self>, interpreter: Interpreter) -> BoxFuture<'static, Result<Value, Failure>> {
        let tasks = self.tasks;
        Box::pin(async move {
            let values = interpreter.distribute(tasks).await?;
            Ok(Box::new(values) as Value)
        })
    }
}

pub(super) fn group<X: Send + 'static>(tasks: Vec<Task<X>>) -> Box<dyn Fanout> {
    Box::new(Group { tasks })
}
