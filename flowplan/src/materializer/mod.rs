//! Step materialization.
//!
//! This module provides:
//! - The [`StepMaterializer`] capability trait
//! - A piece catalog describing available triggers and actions
//! - [`CatalogStepMaterializer`], which resolves intents against a catalog

mod catalog;
mod catalog_materializer;

pub use catalog::{OperationDefinition, PieceCatalog, PieceDefinition, PropertyDefinition};
pub use catalog_materializer::{step_input_schema, CatalogStepMaterializer};

use crate::core::{MaterializedStep, PlannedStepIntent};
use crate::errors::MaterializationError;
use async_trait::async_trait;

/// Everything a materializer sees for one step.
#[derive(Debug, Clone, Copy)]
pub struct StepRequest<'a> {
    /// The intent to expand.
    pub intent: &'a PlannedStepIntent,
    /// Position of the intent in the plan.
    pub index: usize,
    /// Steps already materialized in this run, in order.
    pub previous_steps: &'a [MaterializedStep],
}

impl<'a> StepRequest<'a> {
    /// Creates a request.
    #[must_use]
    pub const fn new(
        intent: &'a PlannedStepIntent,
        index: usize,
        previous_steps: &'a [MaterializedStep],
    ) -> Self {
        Self {
            intent,
            index,
            previous_steps,
        }
    }
}

/// Turns one planned step intent into a fully specified step.
#[async_trait]
pub trait StepMaterializer: Send + Sync {
    /// Produces the concrete step for `request.intent`.
    async fn create_step(
        &self,
        request: StepRequest<'_>,
    ) -> Result<MaterializedStep, MaterializationError>;
}
