//! The coarse plan generator.

use super::{render_plan_prompt, PlanOptions};
use crate::contracts::{OutputSchema, SchemaType, StructuredOutput};
use crate::core::{CoarsePlan, ContextItem, ExplicitStepSequence, StepKind};
use crate::errors::GenerationError;
use crate::generation::{generate_structured, GenerationProvider, GenerationSettings, RetryConfig};
use std::sync::Arc;
use tracing::{debug, info};

fn step_intent_schema() -> OutputSchema {
    OutputSchema::new("PlannedStep")
        .required("type", SchemaType::one_of(StepKind::ALL.iter().map(StepKind::as_str)))
        .describe("TRIGGER, ACTION or ROUTER")
        .optional("pieceName", SchemaType::non_empty_string())
        .describe("Piece the step uses")
        .optional("actionOrTriggerName", SchemaType::non_empty_string())
        .describe("Action or trigger of the piece")
        .optional("condition", SchemaType::string())
        .describe("Branch condition, routers only")
}

/// Schema every coarse plan must satisfy.
#[must_use]
pub fn plan_schema() -> OutputSchema {
    OutputSchema::new("CoarsePlan")
        .required("name", SchemaType::non_empty_string())
        .describe("Descriptive name that summarizes what the flow does")
        .required("description", SchemaType::string())
        .describe("Purpose of the flow")
        .required("steps", SchemaType::array_of(SchemaType::object(step_intent_schema()), 1))
        .describe("Ordered steps")
}

impl StructuredOutput for CoarsePlan {
    fn output_schema() -> OutputSchema {
        plan_schema()
    }
}

/// Produces coarse plans through a generation provider.
pub struct CoarsePlanGenerator {
    provider: Arc<dyn GenerationProvider>,
    settings: GenerationSettings,
    retry: RetryConfig,
}

impl CoarsePlanGenerator {
    /// Creates a generator with default settings.
    #[must_use]
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            provider,
            settings: GenerationSettings::default(),
            retry: RetryConfig::default(),
        }
    }

    /// Sets the generation settings.
    #[must_use]
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the retry delays.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the generation settings.
    #[must_use]
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Generates a coarse plan for `prompt` given the retrieved context.
    ///
    /// When `options` carries an explicit step sequence, the plan must
    /// reproduce it: same length, same kinds at each position.
    pub async fn generate_plan(
        &self,
        prompt: &str,
        context: &[ContextItem],
        options: &PlanOptions,
    ) -> Result<CoarsePlan, GenerationError> {
        let text = render_plan_prompt(prompt, context, options);
        debug!(
            context_items = context.len(),
            custom_prompt = options.custom_prompt.is_some(),
            explicit_steps = options.step_sequence().map_or(0, ExplicitStepSequence::len),
            "Generating coarse plan"
        );

        let plan: CoarsePlan =
            generate_structured(self.provider.as_ref(), text, &self.settings, &self.retry).await?;

        if let Some(sequence) = options.step_sequence() {
            check_sequence(&plan, sequence)?;
        }

        info!(plan = %plan.name, steps = plan.steps.len(), "Coarse plan generated");
        Ok(plan)
    }
}

fn check_sequence(
    plan: &CoarsePlan,
    sequence: &ExplicitStepSequence,
) -> Result<(), GenerationError> {
    let expected = sequence.kinds();
    let actual = plan.kinds();
    if expected == actual {
        Ok(())
    } else {
        Err(GenerationError::SequenceMismatch { expected, actual })
    }
}
