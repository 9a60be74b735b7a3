//! A retriever over a fixed set of items.

use super::{rank_and_filter, Retriever};
use crate::core::ContextItem;
use crate::errors::RetrievalError;
use async_trait::async_trait;

/// Returns the same pre-scored items for every prompt.
#[derive(Debug, Clone, Default)]
pub struct StaticRetriever {
    items: Vec<ContextItem>,
}

impl StaticRetriever {
    /// Creates a retriever over `items`.
    #[must_use]
    pub fn new(items: Vec<ContextItem>) -> Self {
        Self { items }
    }

    /// Adds an item.
    #[must_use]
    pub fn with_item(mut self, item: ContextItem) -> Self {
        self.items.push(item);
        self
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn find_relevant_pieces(
        &self,
        _prompt: &str,
        threshold: Option<f64>,
    ) -> Result<Vec<ContextItem>, RetrievalError> {
        Ok(rank_and_filter(self.items.clone(), threshold))
    }
}
