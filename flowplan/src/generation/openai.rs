//! OpenAI-compatible chat completions provider.
//!
//! Sends the prompt as a single user message and asks for a JSON object
//! matching the request schema via `response_format`.

use super::{extract_json_object, GenerationProvider, GenerationRequest};
use crate::errors::{ConfigError, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You produce structured data. \
    Reply with a single JSON object that matches the provided schema and nothing else.";

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token.
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Base URL, without the `/chat/completions` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

const fn default_timeout_ms() -> u64 {
    60_000
}

impl OpenAiConfig {
    /// Creates a config for the default endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Reads `OPENAI_API_KEY` and, if set, `OPENAI_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ConfigError::invalid("OPENAI_API_KEY", "environment variable is not set")
        })?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Generation provider for OpenAI-compatible chat completion APIs.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    http: Client,
}

impl OpenAiProvider {
    /// Creates a provider.
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self { config, http })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request_body(request: &GenerationRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model,
            "temperature": request.temperature,
            "max_tokens": request.max_output_tokens,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": request.prompt},
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema.name(),
                    "schema": request.schema.to_json_schema(),
                    "strict": false,
                },
            },
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

fn map_send_error(err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(err.to_string())
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<serde_json::Value, ProviderError> {
        debug!(model = %request.model, schema = request.schema.name(), "Sending chat completion");

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&Self::build_request_body(request))
            .send()
            .await
            .map_err(|e| map_send_error(&e))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("response has no content".to_string()))?;

        extract_json_object(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{OutputSchema, SchemaType};
    use crate::generation::GenerationSettings;

    #[test]
    fn test_request_body() {
        let schema = OutputSchema::new("Plan").required("name", SchemaType::string());
        let request = GenerationRequest::new("plan it", schema, &GenerationSettings::default());
        let body = OpenAiProvider::build_request_body(&request);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][1]["content"], "plan it");
        assert_eq!(body["response_format"]["json_schema"]["name"], "Plan");
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["required"],
            serde_json::json!(["name"])
        );
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let config = OpenAiConfig::new("k").with_base_url("http://localhost:8080/v1/");
        let provider = OpenAiProvider::new(config).unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let json = serde_json::to_value(OpenAiConfig::new("secret")).unwrap();
        assert!(json.get("api_key").is_none());
        assert_eq!(json["timeout_ms"], 60_000);
    }
}
