//! The planning pipeline.
//!
//! A run goes retrieve → plan → materialize each step in order, reporting
//! each milestone to the run's sink. Any failure ends the run; events
//! already sent stay sent.

use super::PipelineState;
use crate::config::PlannerConfig;
use crate::core::{CoarsePlan, ContextItem, FlowDocument, MaterializedStep};
use crate::errors::PlannerError;
use crate::events::{sink_or_noop, EventSink, ProgressEvent};
use crate::generation::GenerationProvider;
use crate::materializer::{CatalogStepMaterializer, PieceCatalog, StepMaterializer, StepRequest};
use crate::observability::{PlanSpanAttributes, SpanTimer};
use crate::planner::{CoarsePlanGenerator, PlanOptions};
use crate::retrieval::Retriever;
use crate::utils::generate_run_id;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

/// Turns free-text requests into flows.
///
/// A planner holds only shared collaborators, so one instance can serve
/// any number of concurrent runs.
pub struct FlowPlanner {
    retriever: Arc<dyn Retriever>,
    generator: CoarsePlanGenerator,
    materializer: Arc<dyn StepMaterializer>,
    relevance_threshold: Option<f64>,
}

impl FlowPlanner {
    /// Creates a planner with default settings.
    #[must_use]
    pub fn new(
        retriever: Arc<dyn Retriever>,
        provider: Arc<dyn GenerationProvider>,
        materializer: Arc<dyn StepMaterializer>,
    ) -> Self {
        Self {
            retriever,
            generator: CoarsePlanGenerator::new(provider),
            materializer,
            relevance_threshold: None,
        }
    }

    /// Creates a planner from a config.
    #[must_use]
    pub fn from_config(
        config: &PlannerConfig,
        retriever: Arc<dyn Retriever>,
        provider: Arc<dyn GenerationProvider>,
        materializer: Arc<dyn StepMaterializer>,
    ) -> Self {
        Self {
            retriever,
            generator: CoarsePlanGenerator::new(provider)
                .with_settings(config.generation.clone())
                .with_retry(config.retry.clone()),
            materializer,
            relevance_threshold: config.relevance_threshold,
        }
    }

    /// Creates a planner whose steps are resolved against `catalog`.
    ///
    /// The same provider generates the plan and each step's input.
    #[must_use]
    pub fn for_catalog(
        config: &PlannerConfig,
        retriever: Arc<dyn Retriever>,
        provider: Arc<dyn GenerationProvider>,
        catalog: Arc<PieceCatalog>,
    ) -> Self {
        let materializer = CatalogStepMaterializer::new(catalog)
            .with_provider(Arc::clone(&provider))
            .with_settings(config.step_generation.clone())
            .with_retry(config.retry.clone());
        Self::from_config(config, retriever, provider, Arc::new(materializer))
    }

    /// Sets the threshold used when a run does not supply one.
    #[must_use]
    pub fn with_relevance_threshold(mut self, threshold: f64) -> Self {
        self.relevance_threshold = Some(threshold);
        self
    }

    /// Returns the threshold used when a run does not supply one.
    ///
    /// `None` leaves the choice to the retriever.
    #[must_use]
    pub fn relevance_threshold(&self) -> Option<f64> {
        self.relevance_threshold
    }

    /// Plans a flow for `prompt`.
    ///
    /// Events go to `observer`, or nowhere when it is `None`. On success the
    /// observer has seen CONTEXT_FOUND, PLAN_GENERATED and one STEP_CREATED
    /// per step, in that order. A blank prompt or unusable options fail with
    /// `InvalidInput` before any collaborator is called.
    pub async fn plan(
        &self,
        prompt: &str,
        observer: Option<Arc<dyn EventSink>>,
        options: PlanOptions,
    ) -> Result<FlowDocument, PlannerError> {
        if prompt.trim().is_empty() {
            return Err(PlannerError::InvalidInput("prompt must not be blank".to_string()));
        }
        options.validate()?;

        let attrs = PlanSpanAttributes::new(generate_run_id(), prompt, &options)
            .with_default_threshold(self.relevance_threshold);
        let threshold = attrs.relevance_threshold;
        let span = info_span!(
            "plan",
            run_id = %attrs.run_id,
            prompt_hash = %attrs.prompt_hash,
            custom_prompt = attrs.custom_prompt,
            explicit_steps = attrs.explicit_steps,
            relevance_threshold = ?threshold
        );

        let mut run = PlanRun {
            planner: self,
            sink: sink_or_noop(observer),
            state: PipelineState::Start,
        };
        run.execute(prompt, &options, threshold).instrument(span).await
    }
}

struct PlanRun<'a> {
    planner: &'a FlowPlanner,
    sink: Arc<dyn EventSink>,
    state: PipelineState,
}

impl PlanRun<'_> {
    async fn execute(
        &mut self,
        prompt: &str,
        options: &PlanOptions,
        threshold: Option<f64>,
    ) -> Result<FlowDocument, PlannerError> {
        let timer = SpanTimer::start("plan");
        info!("Planning started");

        let result = self.run_stages(prompt, options, threshold).await;
        match &result {
            Ok(flow) => info!(
                flow = %flow.name,
                steps = flow.steps.len(),
                duration_ms = timer.elapsed_ms(),
                "Planning completed"
            ),
            Err(e) => {
                self.state = PipelineState::Failed;
                warn!(
                    stage = e.stage(),
                    error = %e,
                    duration_ms = timer.elapsed_ms(),
                    "Planning failed"
                );
            }
        }
        result
    }

    async fn run_stages(
        &mut self,
        prompt: &str,
        options: &PlanOptions,
        threshold: Option<f64>,
    ) -> Result<FlowDocument, PlannerError> {
        let context = self.retrieve(prompt, threshold).await?;
        let plan = self.generate(prompt, &context, options).await?;
        let steps = self.materialize(&plan).await?;

        self.advance(PipelineState::Done)?;
        Ok(FlowDocument {
            name: plan.name,
            description: plan.description,
            steps,
        })
    }

    async fn retrieve(
        &mut self,
        prompt: &str,
        threshold: Option<f64>,
    ) -> Result<Vec<ContextItem>, PlannerError> {
        let context = self
            .planner
            .retriever
            .find_relevant_pieces(prompt, threshold)
            .await?;

        self.advance(PipelineState::ContextRetrieved)?;
        debug!(stage = "retrieval", items = context.len(), "Context retrieved");
        self.sink.try_emit(ProgressEvent::context_found(&context));
        Ok(context)
    }

    async fn generate(
        &mut self,
        prompt: &str,
        context: &[ContextItem],
        options: &PlanOptions,
    ) -> Result<CoarsePlan, PlannerError> {
        let plan = self
            .planner
            .generator
            .generate_plan(prompt, context, options)
            .await?;

        self.advance(PipelineState::PlanGenerated)?;
        debug!(stage = "generation", steps = plan.steps.len(), "Plan generated");
        self.sink.try_emit(ProgressEvent::plan_generated(&plan));
        Ok(plan)
    }

    async fn materialize(
        &mut self,
        plan: &CoarsePlan,
    ) -> Result<Vec<MaterializedStep>, PlannerError> {
        let mut steps: Vec<MaterializedStep> = Vec::with_capacity(plan.steps.len());

        for (index, intent) in plan.steps.iter().enumerate() {
            self.advance(PipelineState::Materializing(index))?;

            let request = StepRequest::new(intent, index, &steps);
            let result = self.planner.materializer.create_step(request).await;
            let step = result.map_err(|source| PlannerError::Materialization { index, source })?;

            debug!(
                stage = "materialization",
                step_index = index,
                step = %step.name,
                "Step created"
            );
            self.sink.try_emit(ProgressEvent::step_created(&step));
            steps.push(step);
        }

        Ok(steps)
    }

    fn advance(&mut self, next: PipelineState) -> Result<(), PlannerError> {
        self.state = self.state.transition(next)?;
        Ok(())
    }
}
