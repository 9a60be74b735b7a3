//! Structured generation through an external text-generation provider.
//!
//! This module provides:
//! - The [`GenerationProvider`] capability trait
//! - Per-call generation settings
//! - Retrying, schema-validated structured generation

#[cfg(feature = "http")]
mod openai;
mod retry;
mod settings;
mod structured;

#[cfg(feature = "http")]
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use retry::{with_retry, BackoffStrategy, JitterStrategy, RetryConfig};
pub use settings::GenerationSettings;
pub use structured::{extract_json_object, generate_structured};

use crate::contracts::OutputSchema;
use crate::errors::ProviderError;
use async_trait::async_trait;

/// One call to a generation provider.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The full prompt text.
    pub prompt: String,
    /// Schema the returned object must satisfy.
    pub schema: OutputSchema,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    /// Creates a request from a prompt, a schema and call settings.
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        schema: OutputSchema,
        settings: &GenerationSettings,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            schema,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        }
    }
}

/// Capability that turns a prompt plus an output schema into a JSON object.
///
/// A provider makes a single attempt per call. Retrying and schema
/// validation happen in [`generate_structured`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Returns a short provider name for logs.
    fn name(&self) -> &str;

    /// Generates one JSON object for the request.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<serde_json::Value, ProviderError>;
}
