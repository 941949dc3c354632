use std::any::{type_name, Any};
use std::marker::PhantomData;

use super::Value;

/// A render function paired with the value it will consume.
///
/// The value stays readable until the interpreter applies the function.
pub trait Rendering: Send {
    fn value(&self) -> &(dyn Any + Send);

    /// Type name of the render function.
    fn renderer(&self) -> &'static str;

    fn apply(self: Box<Self>) -> Value;
}

struct Deferred<V, R, F> {
    renderer: F,
    value: V,
    _out: PhantomData<fn() -> R>,
}

impl<V, R, F> Rendering for Deferred<V, R, F>
where
    V: Send + 'static,
    R: Send + 'static,
    F: FnOnce(&V) -> R + Send + 'static,
{
    fn value(&self) -> &(dyn Any + Send) {
        &self.value
    }

    fn renderer(&self) -> &'static str {
        type_name::<F>()
    }

    fn apply(self: Box<Self>) -> Value {
        let Deferred { renderer, value, .. } = *self;
        Box::new(renderer(&value))
    }
}

pub(super) fn deferred<V, R, F>(renderer: F, value: V) -> Box<dyn Rendering>
where
    V: Send + 'static,
    R: Send + 'static,
    F: FnOnce(&V) -> R + Send + 'static,
{
    Box::new(Deferred {
        renderer,
        value,
        _out: PhantomData,
    })
}
