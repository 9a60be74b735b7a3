//! Test assertions for events and flows.

use crate::core::{FlowDocument, StepKind};
use crate::events::ProgressEvent;

/// Asserts that `events` have exactly the given types, in order.
pub fn assert_event_types(events: &[ProgressEvent], expected: &[&str]) {
    let actual: Vec<&str> = events.iter().map(ProgressEvent::event_type).collect();
    assert_eq!(
        actual, expected,
        "Expected events {expected:?}, got {actual:?}"
    );
}

/// Asserts that the flow's steps have the given kinds, in order.
pub fn assert_step_kinds(flow: &FlowDocument, expected: &[StepKind]) {
    let actual = flow.kinds();
    assert_eq!(
        actual, expected,
        "Expected step kinds {expected:?}, got {actual:?}"
    );
}

/// Asserts that the flow's steps have the given names, in order.
pub fn assert_step_names(flow: &FlowDocument, expected: &[&str]) {
    let actual: Vec<&str> = flow.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        actual, expected,
        "Expected step names {expected:?}, got {actual:?}"
    );
}
