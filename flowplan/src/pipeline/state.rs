//! Planning run states and their legal transitions.

use crate::errors::PlannerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a planning run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Nothing has happened yet.
    #[default]
    Start,
    /// Context was retrieved and announced.
    ContextRetrieved,
    /// A coarse plan was generated and announced.
    PlanGenerated,
    /// The step at this index is being materialized.
    Materializing(usize),
    /// The flow was assembled.
    Done,
    /// The run failed.
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::ContextRetrieved => write!(f, "context_retrieved"),
            Self::PlanGenerated => write!(f, "plan_generated"),
            Self::Materializing(index) => write!(f, "materializing({index})"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl PipelineState {
    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if moving to `next` is legal.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        match (*self, next) {
            (Self::Done | Self::Failed, _) => false,
            (_, Self::Failed)
            | (Self::Start, Self::ContextRetrieved)
            | (Self::ContextRetrieved, Self::PlanGenerated)
            | (Self::PlanGenerated, Self::Materializing(0))
            | (Self::Materializing(_), Self::Done) => true,
            (Self::Materializing(current), Self::Materializing(n)) => n == current + 1,
            _ => false,
        }
    }

    /// Returns `next` if the transition is legal.
    pub fn transition(self, next: Self) -> Result<Self, PlannerError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(PlannerError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}
