//! Schema-validated structured generation.

use super::{with_retry, GenerationProvider, GenerationRequest, GenerationSettings, RetryConfig};
use crate::contracts::{StructuredOutput, TypedOutput};
use crate::errors::{GenerationError, ProviderError};
use crate::utils::fingerprint;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Asks `provider` for a `T`, retrying transient failures and validating
/// the result against `T`'s schema.
///
/// Schema violations are returned immediately; they are not retried.
pub async fn generate_structured<T: StructuredOutput>(
    provider: &dyn GenerationProvider,
    prompt: String,
    settings: &GenerationSettings,
    retry: &RetryConfig,
) -> Result<T, GenerationError> {
    let typed = TypedOutput::<T>::new();
    let request = GenerationRequest::new(prompt, typed.schema().clone(), settings);
    let prompt_hash = fingerprint(&request.prompt);

    debug!(
        provider = provider.name(),
        model = %request.model,
        schema = request.schema.name(),
        prompt_hash = %prompt_hash,
        max_attempts = settings.max_attempts(),
        "Requesting structured output"
    );

    let request = &request;
    let raw = with_retry(retry, settings.max_attempts(), |attempt| {
        debug!(attempt, prompt_hash = %prompt_hash, "Calling provider");
        provider.generate(request)
    })
    .await?;

    typed.decode(raw).map_err(|e| {
        warn!(
            schema = request.schema.name(),
            prompt_hash = %prompt_hash,
            error = %e,
            "Provider output failed schema validation"
        );
        GenerationError::Schema(e)
    })
}

fn fenced_json() -> &'static Regex {
    static FENCED: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    FENCED.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").expect("fence pattern is valid")
    })
}

/// Parses a JSON object out of model text.
///
/// Accepts bare JSON or JSON wrapped in a Markdown code fence.
pub fn extract_json_object(text: &str) -> Result<serde_json::Value, ProviderError> {
    let trimmed = text.trim();
    let candidate = fenced_json()
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map_or(trimmed, |m| m.as_str());

    match serde_json::from_str::<serde_json::Value>(candidate) {
        Ok(value @ serde_json::Value::Object(_)) => Ok(value),
        Ok(_) => Err(ProviderError::InvalidResponse("expected a JSON object".to_string())),
        Err(e) => Err(ProviderError::InvalidResponse(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{OutputSchema, SchemaType};
    use crate::generation::MockGenerationProvider;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Greeting {
        text: String,
    }

    impl StructuredOutput for Greeting {
        fn output_schema() -> OutputSchema {
            OutputSchema::new("Greeting").required("text", SchemaType::non_empty_string())
        }
    }

    fn settings() -> GenerationSettings {
        GenerationSettings::new().with_max_retries(2)
    }

    #[tokio::test]
    async fn test_valid_output_is_decoded() {
        let mut provider = MockGenerationProvider::new();
        provider.expect_name().return_const("mock".to_string());
        provider
            .expect_generate()
            .withf(|req| req.prompt == "say hi" && req.schema.name() == "Greeting")
            .times(1)
            .returning(|_| Ok(serde_json::json!({"text": "hi"})));

        let greeting: Greeting =
            generate_structured(&provider, "say hi".into(), &settings(), &RetryConfig::immediate())
                .await
                .unwrap();
        assert_eq!(greeting, Greeting { text: "hi".into() });
    }

    #[tokio::test]
    async fn test_request_carries_settings() {
        let mut provider = MockGenerationProvider::new();
        provider.expect_name().return_const("mock".to_string());
        provider
            .expect_generate()
            .withf(|req| {
                req.model == "gpt-4o"
                    && (req.temperature - 0.3).abs() < f32::EPSILON
                    && req.max_output_tokens == 1000
            })
            .returning(|_| Ok(serde_json::json!({"text": "ok"})));

        let result: Result<Greeting, _> = generate_structured(
            &provider,
            "p".into(),
            &GenerationSettings::default(),
            &RetryConfig::immediate(),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_transient_errors_exhaust_retries() {
        let mut provider = MockGenerationProvider::new();
        provider.expect_name().return_const("mock".to_string());
        provider
            .expect_generate()
            .times(3)
            .returning(|_| Err(ProviderError::RateLimited));

        let retry = RetryConfig::immediate();
        let err = generate_structured::<Greeting>(&provider, "p".into(), &settings(), &retry)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Provider { attempts: 3, .. }));
    }

    #[tokio::test]
    async fn test_schema_violation_is_not_retried() {
        let mut provider = MockGenerationProvider::new();
        provider.expect_name().return_const("mock".to_string());
        provider
            .expect_generate()
            .times(1)
            .returning(|_| Ok(serde_json::json!({"text": ""})));

        let retry = RetryConfig::immediate();
        let err = generate_structured::<Greeting>(&provider, "p".into(), &settings(), &retry)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Schema(_)));
    }

    #[test]
    fn test_extract_bare_json() {
        let value = extract_json_object(r#" {"a": 1} "#).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_extract_fenced_json() {
        let text = "Here is the plan:\n```json\n{\"name\": \"x\"}\n```\n";
        assert_eq!(extract_json_object(text).unwrap()["name"], "x");
    }

    #[test]
    fn test_extract_rejects_non_object() {
        assert!(matches!(
            extract_json_object("[1, 2]"),
            Err(ProviderError::InvalidResponse(_))
        ));
        assert!(extract_json_object("no json here").is_err());
    }
}
