use std::collections::VecDeque;

use super::{Machine, Value};

pub(crate) type Frame = Box<dyn FnOnce(Value) -> Machine + Send>;

/// Continuations waiting on a step, nearest first.
///
/// Binding appends to the outermost queue. When a continuation returns a
/// task that carries its own queue, that queue is stacked on top and drained
/// before the outer one resumes. No queue in the stack is ever empty.
#[derive(Default)]
pub(crate) struct Frames {
    stack: Vec<VecDeque<Frame>>,
}

impl Frames {
    pub(crate) fn push_back(&mut self, frame: Frame) {
        match self.stack.first_mut() {
            Some(queue) => queue.push_back(frame),
            None => self.stack.push(VecDeque::from([frame])),
        }
    }

    pub(crate) fn pop_front(&mut self) -> Option<Frame> {
        let queue = self.stack.last_mut()?;
        let frame = queue.pop_front();
        if queue.is_empty() {
            self.stack.pop();
        }
        frame
    }

    pub(crate) fn stack_on(&mut self, inner: Frames) {
        self.stack.extend(inner.stack);
    }

    pub(crate) fn len(&self) -> usize {
        self.stack.iter().map(VecDeque::len).sum()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
