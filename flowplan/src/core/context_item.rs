//! Retrieved context items.

use serde::{Deserialize, Serialize};

/// A piece returned by the retriever as relevant to a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextItem {
    /// Identifier of the piece.
    pub piece_name: String,
    /// Descriptive content used as planning context.
    pub content: String,
    /// Similarity to the prompt. Retrievers that do not score leave it at 0.
    #[serde(default)]
    pub similarity: f64,
    /// Display metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl ContextItem {
    /// Creates a new context item with no score and no logo.
    #[must_use]
    pub fn new(piece_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            piece_name: piece_name.into(),
            content: content.into(),
            similarity: 0.0,
            logo_url: None,
        }
    }

    /// Sets the similarity score.
    #[must_use]
    pub fn with_similarity(mut self, similarity: f64) -> Self {
        self.similarity = similarity;
        self
    }

    /// Sets the logo URL.
    #[must_use]
    pub fn with_logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    /// Renders the item as a `- {name}: {content}` prompt line.
    #[must_use]
    pub fn prompt_line(&self) -> String {
        format!("- {}: {}", self.piece_name, self.content)
    }
}

/// The shape of a context item inside a `CONTEXT_FOUND` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevantPiece {
    /// Identifier of the piece.
    pub piece_name: String,
    /// Descriptive content.
    pub content: String,
    /// Logo URL, `null` when unknown.
    pub logo_url: Option<String>,
    /// Similarity score.
    pub relevance_score: f64,
}

impl From<&ContextItem> for RelevantPiece {
    fn from(item: &ContextItem) -> Self {
        Self {
            piece_name: item.piece_name.clone(),
            content: item.content.clone(),
            logo_url: item.logo_url.clone(),
            relevance_score: item.similarity,
        }
    }
}
