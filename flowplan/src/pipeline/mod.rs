//! Pipeline orchestration.
//!
//! This module provides:
//! - The [`FlowPlanner`] entry point
//! - Run states with checked transitions

mod orchestrator;
mod state;

pub use orchestrator::FlowPlanner;
pub use state::PipelineState;
