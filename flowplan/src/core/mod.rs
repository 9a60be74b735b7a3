//! Core domain model types for flowplan.
//!
//! This module contains the values that flow through one planning run:
//! - Step kind enum
//! - Retrieved context items
//! - Coarse plans and their step intents
//! - Materialized steps and the final flow document

mod context_item;
mod kind;
mod plan;
mod step;

pub use context_item::{ContextItem, RelevantPiece};
pub use kind::StepKind;
pub use plan::{CoarsePlan, ExplicitStep, ExplicitStepSequence, PlannedStepIntent};
pub use step::{FlowDocument, MaterializedStep};
