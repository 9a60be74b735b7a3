//! Planner configuration.
//!
//! Configuration is plain serde data. Every field has a default, so an
//! empty JSON object is a valid configuration.

use crate::errors::ConfigError;
use crate::generation::{GenerationSettings, RetryConfig};
use crate::observability::{init_tracing, LogFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a [`FlowPlanner`](crate::pipeline::FlowPlanner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Minimum similarity for retrieved context. When unset the retriever
    /// applies its own default.
    #[serde(default)]
    pub relevance_threshold: Option<f64>,
    /// Settings for coarse plan generation.
    #[serde(default)]
    pub generation: GenerationSettings,
    /// Settings for per-step input generation.
    #[serde(default = "default_step_generation")]
    pub step_generation: GenerationSettings,
    /// Delays between provider retries.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_step_generation() -> GenerationSettings {
    GenerationSettings::default().with_max_output_tokens(2000)
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: None,
            generation: GenerationSettings::default(),
            step_generation: default_step_generation(),
            retry: RetryConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl PlannerConfig {
    /// Creates a config with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Sets the default relevance threshold.
    #[must_use]
    pub fn with_relevance_threshold(mut self, threshold: f64) -> Self {
        self.relevance_threshold = Some(threshold);
        self
    }

    /// Sets the coarse plan generation settings.
    #[must_use]
    pub fn with_generation(mut self, settings: GenerationSettings) -> Self {
        self.generation = settings;
        self
    }

    /// Sets the step input generation settings.
    #[must_use]
    pub fn with_step_generation(mut self, settings: GenerationSettings) -> Self {
        self.step_generation = settings;
        self
    }

    /// Sets the retry delays.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the log output format.
    #[must_use]
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Installs the global tracing subscriber in the configured format.
    ///
    /// Call once at startup, before the first planning run. Returns false
    /// if a subscriber was already installed.
    pub fn install_tracing(&self) -> bool {
        init_tracing(self.log_format)
    }

    /// Checks that every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threshold) = self.relevance_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::invalid("relevance_threshold", "must be within [0, 1]"));
            }
        }
        validate_settings("generation", &self.generation)?;
        validate_settings("step_generation", &self.step_generation)?;
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::invalid(
                "retry.base_delay_ms",
                "must not exceed retry.max_delay_ms",
            ));
        }
        Ok(())
    }
}

fn validate_settings(prefix: &str, settings: &GenerationSettings) -> Result<(), ConfigError> {
    if settings.model.trim().is_empty() {
        return Err(ConfigError::invalid(format!("{prefix}.model"), "must not be blank"));
    }
    if !(0.0..=2.0).contains(&settings.temperature) {
        return Err(ConfigError::invalid(format!("{prefix}.temperature"), "must be within [0, 2]"));
    }
    if settings.max_output_tokens == 0 {
        return Err(ConfigError::invalid(
            format!("{prefix}.max_output_tokens"),
            "must be greater than 0",
        ));
    }
    Ok(())
}
