//! Output contracts for structured generation.
//!
//! This module provides:
//! - Declarative output schemas
//! - Validation of raw provider output against a schema
//! - Typed decoding of validated output

mod schema;
mod typed_output;

pub use schema::{FieldSpec, OutputSchema, SchemaType};
pub use typed_output::{SchemaError, StructuredOutput, TypedOutput};
