//! Per-run planning options.

use crate::core::ExplicitStepSequence;
use crate::errors::PlannerError;
use serde::{Deserialize, Serialize};

/// Options for a single planning run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOptions {
    /// Minimum similarity for retrieved context. Falls back to the
    /// configured default when unset.
    #[serde(default)]
    pub relevance_threshold: Option<f64>,
    /// Replaces the default planning instructions.
    #[serde(default)]
    pub custom_prompt: Option<String>,
    /// Step order the plan must follow.
    #[serde(default, rename = "stepConfig")]
    pub explicit_steps: Option<ExplicitStepSequence>,
}

impl PlanOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relevance threshold.
    #[must_use]
    pub fn with_relevance_threshold(mut self, threshold: f64) -> Self {
        self.relevance_threshold = Some(threshold);
        self
    }

    /// Sets the custom prompt.
    #[must_use]
    pub fn with_custom_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.custom_prompt = Some(prompt.into());
        self
    }

    /// Sets the explicit step sequence.
    #[must_use]
    pub fn with_explicit_steps(mut self, steps: ExplicitStepSequence) -> Self {
        self.explicit_steps = Some(steps);
        self
    }

    /// Returns the explicit sequence if it has at least one step.
    #[must_use]
    pub fn step_sequence(&self) -> Option<&ExplicitStepSequence> {
        self.explicit_steps.as_ref().filter(|s| !s.is_empty())
    }

    /// Rejects options a run cannot honour.
    ///
    /// A `stepConfig` with no steps is an error rather than a request for
    /// the default guidance.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if matches!(&self.explicit_steps, Some(steps) if steps.is_empty()) {
            return Err(PlannerError::InvalidInput(
                "stepConfig must contain at least one step".to_string(),
            ));
        }
        if let Some(threshold) = self.relevance_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(PlannerError::InvalidInput(format!(
                    "relevanceThreshold must be within [0, 1], got {threshold}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StepKind;

    #[test]
    fn test_empty_sequence_is_rejected() {
        let options = PlanOptions::new().with_explicit_steps(ExplicitStepSequence::default());
        assert!(options.step_sequence().is_none());
        assert!(matches!(options.validate(), Err(PlannerError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_threshold_range() {
        assert!(PlanOptions::new().validate().is_ok());
        assert!(PlanOptions::new().with_relevance_threshold(0.5).validate().is_ok());
        assert!(PlanOptions::new().with_relevance_threshold(1.5).validate().is_err());
    }

    #[test]
    fn test_deserialize_client_shape() {
        let options: PlanOptions = serde_json::from_value(serde_json::json!({
            "relevanceThreshold": 0.4,
            "stepConfig": {"steps": [{"type": "TRIGGER", "description": "On new row"}]}
        }))
        .unwrap();

        assert_eq!(options.relevance_threshold, Some(0.4));
        assert_eq!(options.step_sequence().map(|s| s.kinds()), Some(vec![StepKind::Trigger]));
        assert_eq!(options.custom_prompt, None);
    }
}
