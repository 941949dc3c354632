//! semflow-cli library: exposes command assembly for unit tests.

pub mod app;
pub mod commands;
pub mod error;
pub mod pipeline;
pub mod telemetry;
