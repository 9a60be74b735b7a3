//! Materialized steps and the assembled flow.

use super::StepKind;
use serde::{Deserialize, Serialize};

/// A fully specified flow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedStep {
    /// Unique step name within the flow (`trigger`, `step_1`, ...).
    pub name: String,
    /// The step kind.
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Human-readable label.
    pub display_name: String,
    /// Resolved piece.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece_name: Option<String>,
    /// Resolved action or trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_or_trigger_name: Option<String>,
    /// Branch condition for routers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Generated input configuration.
    #[serde(default)]
    pub input: serde_json::Map<String, serde_json::Value>,
}

impl MaterializedStep {
    /// Creates a step with an empty input.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: StepKind, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            display_name: display_name.into(),
            piece_name: None,
            action_or_trigger_name: None,
            condition: None,
            input: serde_json::Map::new(),
        }
    }

    /// Sets the piece and action/trigger binding.
    #[must_use]
    pub fn with_binding(mut self, piece: impl Into<String>, name: impl Into<String>) -> Self {
        self.piece_name = Some(piece.into());
        self.action_or_trigger_name = Some(name.into());
        self
    }

    /// Sets the branch condition.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Sets one input field.
    #[must_use]
    pub fn with_input(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.input.insert(key.into(), value);
        self
    }
}

/// The terminal artifact of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    /// Flow name, taken from the coarse plan.
    pub name: String,
    /// Flow description, taken from the coarse plan.
    pub description: String,
    /// Materialized steps in plan order.
    pub steps: Vec<MaterializedStep>,
}

impl FlowDocument {
    /// Step kinds in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }

    /// Looks up a step by name.
    #[must_use]
    pub fn step(&self, name: &str) -> Option<&MaterializedStep> {
        self.steps.iter().find(|s| s.name == name)
    }
}
