//! The progress-event protocol.
//!
//! On the wire every event is `{ "type": ..., "data": { "timestamp": ..., ... } }`.

use crate::core::{CoarsePlan, ContextItem, MaterializedStep, RelevantPiece};
use crate::utils::iso_timestamp;
use serde::{Deserialize, Serialize};

/// Payload of a `CONTEXT_FOUND` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextFoundData {
    /// When the event was created (ISO 8601).
    pub timestamp: String,
    /// Every item the retriever returned.
    pub relevant_pieces: Vec<RelevantPiece>,
}

/// Payload of a `PLAN_GENERATED` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanGeneratedData {
    /// When the event was created (ISO 8601).
    pub timestamp: String,
    /// The full coarse plan.
    pub plan: CoarsePlan,
}

/// Payload of a `STEP_CREATED` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepCreatedData {
    /// When the event was created (ISO 8601).
    pub timestamp: String,
    /// The step that was just materialized.
    pub step: MaterializedStep,
}

/// A milestone notification from a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressEvent {
    /// Context retrieval finished.
    ContextFound(ContextFoundData),
    /// The coarse plan was generated.
    PlanGenerated(PlanGeneratedData),
    /// One step was materialized.
    StepCreated(StepCreatedData),
}

impl ProgressEvent {
    /// Creates a `CONTEXT_FOUND` event from retrieved items.
    #[must_use]
    pub fn context_found(items: &[ContextItem]) -> Self {
        Self::ContextFound(ContextFoundData {
            timestamp: iso_timestamp(),
            relevant_pieces: items.iter().map(RelevantPiece::from).collect(),
        })
    }

    /// Creates a `PLAN_GENERATED` event.
    #[must_use]
    pub fn plan_generated(plan: &CoarsePlan) -> Self {
        Self::PlanGenerated(PlanGeneratedData {
            timestamp: iso_timestamp(),
            plan: plan.clone(),
        })
    }

    /// Creates a `STEP_CREATED` event.
    #[must_use]
    pub fn step_created(step: &MaterializedStep) -> Self {
        Self::StepCreated(StepCreatedData {
            timestamp: iso_timestamp(),
            step: step.clone(),
        })
    }

    /// Returns the wire name of the event type.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::ContextFound(_) => "CONTEXT_FOUND",
            Self::PlanGenerated(_) => "PLAN_GENERATED",
            Self::StepCreated(_) => "STEP_CREATED",
        }
    }

    /// Returns the event timestamp.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        match self {
            Self::ContextFound(d) => &d.timestamp,
            Self::PlanGenerated(d) => &d.timestamp,
            Self::StepCreated(d) => &d.timestamp,
        }
    }

    /// Serializes the event to its wire form.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
