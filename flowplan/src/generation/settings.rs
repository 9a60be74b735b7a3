//! Per-call generation settings.

use serde::{Deserialize, Serialize};

/// Model and sampling settings for one kind of generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature. Low values favor consistent plans.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on generated tokens.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Retries after the first call, for transient failures only.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

const fn default_temperature() -> f32 {
    0.3
}

const fn default_max_output_tokens() -> u32 {
    1000
}

const fn default_max_retries() -> usize {
    3
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            max_retries: default_max_retries(),
        }
    }
}

impl GenerationSettings {
    /// Creates settings with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the output token limit.
    #[must_use]
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    /// Sets the retry count.
    #[must_use]
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Total number of calls allowed, the first one included.
    #[must_use]
    pub const fn max_attempts(&self) -> usize {
        self.max_retries.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.model, "gpt-4o");
        assert!((settings.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(settings.max_output_tokens, 1000);
        assert_eq!(settings.max_retries, 3);
        assert_eq!(settings.max_attempts(), 4);
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let settings: GenerationSettings =
            serde_json::from_value(serde_json::json!({"model": "gpt-4o-mini"})).unwrap();
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.max_retries, 3);
    }

    #[test]
    fn test_builder() {
        let settings = GenerationSettings::new()
            .with_model("local")
            .with_temperature(0.0)
            .with_max_output_tokens(50)
            .with_max_retries(0);
        assert_eq!(settings.max_attempts(), 1);
        assert_eq!(settings.max_output_tokens, 50);
    }
}
