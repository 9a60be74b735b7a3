//! Testing utilities for flowplan pipelines.
//!
//! This module provides:
//! - A scripted generation provider and a recording materializer
//! - A retriever that always fails
//! - Sample catalog and plan fixtures
//! - Assertions over emitted events and assembled flows

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_event_types, assert_step_kinds, assert_step_names};
pub use fixtures::{sample_catalog, sample_context, sheets_to_slack_plan, three_step_plan};
pub use mocks::{FailingRetriever, MaterializerCall, RecordingMaterializer, ScriptedProvider};
