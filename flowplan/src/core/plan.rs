//! Coarse plans, step intents and caller-supplied step sequences.

use super::StepKind;
use serde::{Deserialize, Serialize};

/// One unresolved step of a coarse plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedStepIntent {
    /// The step kind.
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Referenced piece.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece_name: Option<String>,
    /// Referenced action or trigger of the piece.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_or_trigger_name: Option<String>,
    /// Branch condition, only meaningful for routers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl PlannedStepIntent {
    /// Creates an intent of the given kind with no references.
    #[must_use]
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            piece_name: None,
            action_or_trigger_name: None,
            condition: None,
        }
    }

    /// Creates a trigger intent.
    #[must_use]
    pub fn trigger(piece: impl Into<String>, trigger: impl Into<String>) -> Self {
        Self::new(StepKind::Trigger).with_piece(piece, trigger)
    }

    /// Creates an action intent.
    #[must_use]
    pub fn action(piece: impl Into<String>, action: impl Into<String>) -> Self {
        Self::new(StepKind::Action).with_piece(piece, action)
    }

    /// Creates a router intent.
    #[must_use]
    pub fn router(condition: impl Into<String>) -> Self {
        Self::new(StepKind::Router).with_condition(condition)
    }

    /// Sets the piece and action/trigger references.
    #[must_use]
    pub fn with_piece(mut self, piece: impl Into<String>, name: impl Into<String>) -> Self {
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
}

/// The high-level plan produced by the first generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoarsePlan {
    /// Descriptive name of the flow.
    pub name: String,
    /// Purpose of the flow.
    pub description: String,
    /// Ordered step intents. Never empty once validated.
    pub steps: Vec<PlannedStepIntent>,
}

impl CoarsePlan {
    /// Returns the step kinds in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }

    /// Returns the distinct piece names the plan references, in first-use order.
    #[must_use]
    pub fn piece_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.steps.iter().filter_map(|s| s.piece_name.as_deref()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// One caller-supplied step: a kind and a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitStep {
    /// Required step kind at this position.
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// What the step should do.
    pub description: String,
}

impl ExplicitStep {
    /// Creates a new explicit step.
    #[must_use]
    pub fn new(kind: StepKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }
}

/// A caller-supplied step order that the generator must reproduce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitStepSequence {
    /// Steps in required order.
    pub steps: Vec<ExplicitStep>,
}

impl ExplicitStepSequence {
    /// Creates a sequence from steps.
    #[must_use]
    pub fn new(steps: Vec<ExplicitStep>) -> Self {
        Self { steps }
    }

    /// Appends a step.
    #[must_use]
    pub fn step(mut self, kind: StepKind, description: impl Into<String>) -> Self {
        self.steps.push(ExplicitStep::new(kind, description));
        self
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the sequence has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step kinds in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }

    /// Renders the sequence as a numbered `{n}. [{kind}] {description}` list.
    #[must_use]
    pub fn numbered_list(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. [{}] {}", i + 1, step.kind, step.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
