//! A local retriever that scores pieces by term overlap with the prompt.

use super::{rank_and_filter, Retriever};
use crate::core::ContextItem;
use crate::errors::RetrievalError;
use async_trait::async_trait;
use std::collections::HashSet;

/// Words too common to count as evidence of relevance.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "the", "to", "of", "in", "on", "for", "is", "it", "when", "with", "from",
    "new", "my", "me", "i", "be", "by", "or", "at", "as", "this", "that",
];

/// Scores each piece by the share of prompt terms found in its name or
/// description.
///
/// The score is in `[0, 1]`: 1 means every meaningful prompt term
/// appears in the piece text.
#[derive(Debug, Clone, Default)]
pub struct LexicalRetriever {
    pieces: Vec<ContextItem>,
}

impl LexicalRetriever {
    /// Creates a retriever over unscored pieces.
    #[must_use]
    pub fn new(pieces: Vec<ContextItem>) -> Self {
        Self { pieces }
    }

    fn terms(text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .filter(|t| !STOP_WORDS.contains(&t.as_str()))
            .collect()
    }

    /// Scores one piece against pre-split prompt terms.
    #[allow(clippy::cast_precision_loss)]
    fn score(prompt_terms: &HashSet<String>, piece: &ContextItem) -> f64 {
        if prompt_terms.is_empty() {
            return 0.0;
        }
        let piece_terms = Self::terms(&format!("{} {}", piece.piece_name, piece.content));
        let hits = prompt_terms.intersection(&piece_terms).count();
        hits as f64 / prompt_terms.len() as f64
    }
}

#[async_trait]
impl Retriever for LexicalRetriever {
    async fn find_relevant_pieces(
        &self,
        prompt: &str,
        threshold: Option<f64>,
    ) -> Result<Vec<ContextItem>, RetrievalError> {
        let prompt_terms = Self::terms(prompt);
        let scored = self
            .pieces
            .iter()
            .map(|piece| {
                let mut item = piece.clone();
                item.similarity = Self::score(&prompt_terms, piece);
                item
            })
            .collect();
        Ok(rank_and_filter(scored, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retriever() -> LexicalRetriever {
        LexicalRetriever::new(vec![
            ContextItem::new("google-sheets", "Read and write spreadsheet rows"),
            ContextItem::new("slack", "Send a message to a Slack channel"),
            ContextItem::new("gmail", "Send and receive email"),
        ])
    }

    #[tokio::test]
    async fn test_relevant_pieces_rank_first() {
        let items = retriever()
            .find_relevant_pieces("Send a Slack message when a row is added to a spreadsheet", None)
            .await
            .unwrap();

        assert_eq!(items[0].piece_name, "slack");
        assert!(items[0].similarity > items[2].similarity);
    }

    #[tokio::test]
    async fn test_threshold_drops_unrelated_pieces() {
        let items = retriever()
            .find_relevant_pieces("post a slack message", Some(0.5))
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].piece_name, "slack");
    }

    #[tokio::test]
    async fn test_stop_word_prompt_scores_zero() {
        let items = retriever().find_relevant_pieces("the and of", None).await.unwrap();
        assert!(items.iter().all(|i| i.similarity == 0.0));
    }
}
