//! Coarse plan generation.
//!
//! The first generation stage: render a planning prompt from the user
//! request and retrieved context, ask the provider for a [`CoarsePlan`],
//! and check the result before anything downstream sees it.
//!
//! [`CoarsePlan`]: crate::core::CoarsePlan

mod generator;
mod options;
mod prompt;

pub use generator::{plan_schema, CoarsePlanGenerator};
pub use options::PlanOptions;
pub use prompt::{render_plan_prompt, GENERIC_GUIDANCE};
