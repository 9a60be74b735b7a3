//! Client for a remote retrieval service.
//!
//! The service receives `{ "prompt", "threshold" }` and answers with a
//! list of matches shaped `{ "content", "similarity"?, "metadata": {
//! "pieceName", "logoUrl"? } }`.

use super::{rank_and_filter, Retriever};
use crate::core::ContextItem;
use crate::errors::RetrievalError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Settings for [`HttpRetriever`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpRetrieverConfig {
    /// Full URL of the search endpoint.
    pub endpoint: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_timeout_ms() -> u64 {
    10_000
}

impl HttpRetrieverConfig {
    /// Creates a config for `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchMatch {
    content: String,
    #[serde(default)]
    similarity: Option<f64>,
    metadata: MatchMetadata,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchMetadata {
    piece_name: String,
    #[serde(default)]
    logo_url: Option<String>,
}

impl From<SearchMatch> for ContextItem {
    fn from(m: SearchMatch) -> Self {
        Self {
            piece_name: m.metadata.piece_name,
            content: m.content,
            similarity: m.similarity.unwrap_or(0.0),
            logo_url: m.metadata.logo_url,
        }
    }
}

/// Retriever backed by an HTTP search endpoint.
pub struct HttpRetriever {
    config: HttpRetrieverConfig,
    http: Client,
}

impl HttpRetriever {
    /// Creates a retriever.
    pub fn new(config: HttpRetrieverConfig) -> Result<Self, RetrievalError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| RetrievalError::Unavailable(e.to_string()))?;
        Ok(Self { config, http })
    }

    fn parse_matches(body: serde_json::Value) -> Result<Vec<ContextItem>, RetrievalError> {
        let matches: Vec<SearchMatch> = serde_json::from_value(body)
            .map_err(|e| RetrievalError::Backend(format!("malformed response: {e}")))?;
        Ok(matches.into_iter().map(ContextItem::from).collect())
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn find_relevant_pieces(
        &self,
        prompt: &str,
        threshold: Option<f64>,
    ) -> Result<Vec<ContextItem>, RetrievalError> {
        debug!(endpoint = %self.config.endpoint, ?threshold, "Querying retrieval service");

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&SearchRequest { prompt, threshold })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RetrievalError::Timeout {
                        timeout_ms: self.config.timeout_ms,
                    }
                } else {
                    RetrievalError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Backend(format!("status {status}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RetrievalError::Backend(e.to_string()))?;

        Ok(rank_and_filter(Self::parse_matches(body)?, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matches_defaults_missing_score() {
        let items = HttpRetriever::parse_matches(serde_json::json!([
            {"content": "Spreadsheets", "similarity": 0.9,
             "metadata": {"pieceName": "google-sheets", "logoUrl": "https://cdn/sheets.svg"}},
            {"content": "Messaging", "metadata": {"pieceName": "slack"}}
        ]))
        .unwrap();

        assert_eq!(items[0].piece_name, "google-sheets");
        assert_eq!(items[0].logo_url.as_deref(), Some("https://cdn/sheets.svg"));
        assert_eq!(items[1].similarity, 0.0);
    }

    #[test]
    fn test_parse_matches_rejects_bad_shape() {
        let err = HttpRetriever::parse_matches(serde_json::json!({"oops": true})).unwrap_err();
        assert!(matches!(err, RetrievalError::Backend(_)));
    }

    #[test]
    fn test_request_omits_missing_threshold() {
        let request = SearchRequest {
            prompt: "p",
            threshold: None,
        };
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(json, serde_json::json!({"prompt": "p"}));
    }
}
