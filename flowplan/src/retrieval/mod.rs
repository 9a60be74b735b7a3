//! Context retrieval.
//!
//! A [`Retriever`] ranks domain pieces by relevance to a prompt. The
//! pipeline only depends on the trait; the implementations here cover
//! fixed fixtures, a local lexical scorer and, with the `http` feature,
//! a remote retrieval service.

#[cfg(feature = "http")]
mod http;
mod lexical;
mod static_retriever;

#[cfg(feature = "http")]
pub use http::{HttpRetriever, HttpRetrieverConfig};
pub use lexical::LexicalRetriever;
pub use static_retriever::StaticRetriever;

use crate::core::ContextItem;
use crate::errors::RetrievalError;
use async_trait::async_trait;
use std::cmp::Ordering;

/// Returns context items relevant to a prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Finds pieces relevant to `prompt`.
    ///
    /// Items scoring below `threshold` are left out. Results should be
    /// ranked by descending similarity.
    async fn find_relevant_pieces(
        &self,
        prompt: &str,
        threshold: Option<f64>,
    ) -> Result<Vec<ContextItem>, RetrievalError>;
}

/// Sorts items by descending similarity and drops those under `threshold`.
///
/// The sort is stable, so equally scored items keep their input order.
#[must_use]
pub fn rank_and_filter(mut items: Vec<ContextItem>, threshold: Option<f64>) -> Vec<ContextItem> {
    if let Some(min) = threshold {
        items.retain(|item| item.similarity >= min);
    }
    items.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
    items
}
