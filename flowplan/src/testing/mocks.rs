//! Test doubles for the pipeline's collaborators.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::{ContextItem, MaterializedStep, PlannedStepIntent, StepKind};
use crate::errors::{MaterializationError, ProviderError, RetrievalError};
use crate::generation::{GenerationProvider, GenerationRequest};
use crate::materializer::{StepMaterializer, StepRequest};
use crate::retrieval::Retriever;

/// A provider that replays a fixed script of responses.
///
/// Every call pops the next entry. Once the script is exhausted, calls fail
/// with a non-transient [`ProviderError::InvalidResponse`].
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<serde_json::Value, ProviderError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedProvider {
    /// Creates a provider with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a successful response.
    #[must_use]
    pub fn respond(self, value: serde_json::Value) -> Self {
        self.script.lock().push_back(Ok(value));
        self
    }

    /// Appends a failure.
    #[must_use]
    pub fn fail(self, error: ProviderError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// Returns every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns the number of scripted entries not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<serde_json::Value, ProviderError> {
        self.requests.lock().push(request.clone());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::InvalidResponse("script exhausted".to_string())))
    }
}

/// One call observed by a [`RecordingMaterializer`].
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializerCall {
    /// Intent position.
    pub index: usize,
    /// The intent that was passed in.
    pub intent: PlannedStepIntent,
    /// Names of the previous steps that were passed in.
    pub previous: Vec<String>,
}

/// A materializer that records its calls and builds trivial steps.
///
/// Steps are named `trigger` for index 0 triggers and `step_{index}`
/// otherwise. Failures can be scheduled per index.
#[derive(Debug, Default)]
pub struct RecordingMaterializer {
    calls: Mutex<Vec<MaterializerCall>>,
    failures: Mutex<HashMap<usize, MaterializationError>>,
}

impl RecordingMaterializer {
    /// Creates a materializer that never fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the call for `index` with `error`.
    #[must_use]
    pub fn fail_at(self, index: usize, error: MaterializationError) -> Self {
        self.failures.lock().insert(index, error);
        self
    }

    /// Returns the recorded calls.
    #[must_use]
    pub fn calls(&self) -> Vec<MaterializerCall> {
        self.calls.lock().clone()
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl StepMaterializer for RecordingMaterializer {
    async fn create_step(
        &self,
        request: StepRequest<'_>,
    ) -> Result<MaterializedStep, MaterializationError> {
        self.calls.lock().push(MaterializerCall {
            index: request.index,
            intent: request.intent.clone(),
            previous: request.previous_steps.iter().map(|s| s.name.clone()).collect(),
        });

        if let Some(error) = self.failures.lock().remove(&request.index) {
            return Err(error);
        }

        let intent = request.intent;
        let name = if intent.kind == StepKind::Trigger && request.index == 0 {
            "trigger".to_string()
        } else {
            format!("step_{}", request.index)
        };
        let label = intent
            .action_or_trigger_name
            .clone()
            .unwrap_or_else(|| intent.kind.to_string());

        let mut step = MaterializedStep::new(name, intent.kind, label);
        step.piece_name.clone_from(&intent.piece_name);
        step.action_or_trigger_name.clone_from(&intent.action_or_trigger_name);
        step.condition.clone_from(&intent.condition);
        Ok(step)
    }
}

/// A retriever that always fails with the same error.
#[derive(Debug)]
pub struct FailingRetriever {
    error: RetrievalError,
    calls: AtomicUsize,
}

impl FailingRetriever {
    /// Creates a retriever that fails with `error`.
    #[must_use]
    pub fn new(error: RetrievalError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a retriever whose service is unavailable.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(RetrievalError::Unavailable("connection refused".to_string()))
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Retriever for FailingRetriever {
    async fn find_relevant_pieces(
        &self,
        _prompt: &str,
        _threshold: Option<f64>,
    ) -> Result<Vec<ContextItem>, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}
