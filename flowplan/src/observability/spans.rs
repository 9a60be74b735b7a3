//! Span attributes and timing for planning runs.

use crate::planner::PlanOptions;
use crate::utils::fingerprint;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

/// Attributes recorded on the span of one planning run.
///
/// The prompt itself is never recorded, only its fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSpanAttributes {
    /// Run ID.
    pub run_id: String,
    /// Fingerprint of the user prompt.
    pub prompt_hash: String,
    /// Whether a custom prompt replaced the default instructions.
    pub custom_prompt: bool,
    /// Length of the explicit step sequence, 0 when absent.
    pub explicit_steps: usize,
    /// Relevance threshold in effect.
    pub relevance_threshold: Option<f64>,
}

impl PlanSpanAttributes {
    /// Builds the attributes for a run.
    #[must_use]
    pub fn new(run_id: Uuid, prompt: &str, options: &PlanOptions) -> Self {
        Self {
            run_id: run_id.to_string(),
            prompt_hash: fingerprint(prompt),
            custom_prompt: options.custom_prompt.is_some(),
            explicit_steps: options.step_sequence().map_or(0, |s| s.len()),
            relevance_threshold: options.relevance_threshold,
        }
    }

    /// Fills in the threshold when the run options did not set one.
    #[must_use]
    pub fn with_default_threshold(mut self, threshold: Option<f64>) -> Self {
        self.relevance_threshold = self.relevance_threshold.or(threshold);
        self
    }
}

/// Simple span timing helper.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExplicitStepSequence, StepKind};

    #[test]
    fn test_attributes_hide_prompt() {
        let options = PlanOptions::new()
            .with_custom_prompt("Be brief")
            .with_explicit_steps(ExplicitStepSequence::default().step(StepKind::Trigger, "start"));
        let attrs = PlanSpanAttributes::new(Uuid::nil(), "secret request", &options);

        assert!(attrs.custom_prompt);
        assert_eq!(attrs.explicit_steps, 1);
        assert_eq!(attrs.prompt_hash, fingerprint("secret request"));
        let json = serde_json::to_string(&attrs).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_default_threshold_only_fills_gaps() {
        let attrs = PlanSpanAttributes::new(Uuid::nil(), "p", &PlanOptions::new());
        assert_eq!(attrs.clone().with_default_threshold(None).relevance_threshold, None);
        assert_eq!(attrs.with_default_threshold(Some(0.3)).relevance_threshold, Some(0.3));

        let options = PlanOptions::new().with_relevance_threshold(0.8);
        let attrs = PlanSpanAttributes::new(Uuid::nil(), "p", &options)
            .with_default_threshold(Some(0.3));
        assert_eq!(attrs.relevance_threshold, Some(0.8));
    }

    #[test]
    fn test_span_timer() {
        let timer = SpanTimer::start("plan");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.elapsed_ms() >= 5.0);
        assert_eq!(timer.name(), "plan");
    }
}
