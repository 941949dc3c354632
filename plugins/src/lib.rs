//! Concrete collaborators for the semflow runtime: filesystem and stdin
//! readers, output sinks, the structural differ and the renderers.

pub mod diff;
pub mod factory;
pub mod io;
pub mod render;
