//! Observability utilities.
//!
//! This module provides:
//! - Subscriber installation for the `tracing` ecosystem
//! - Span attributes and timing for planning runs

mod spans;
mod subscriber;

pub use spans::{PlanSpanAttributes, SpanTimer};
pub use subscriber::{init_tracing, LogFormat};
