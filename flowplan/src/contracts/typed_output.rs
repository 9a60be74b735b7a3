//! Typed decoding of schema-validated provider output.
//!
//! Raw output is first checked against the type's declarative
//! [`OutputSchema`], then deserialized with serde. A value that passes
//! both is safe to hand to downstream stages.

use super::OutputSchema;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Error raised when output does not satisfy its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// Error message.
    pub message: String,
    /// Path of the field that caused the error, if applicable.
    pub field: Option<String>,
}

impl SchemaError {
    /// Creates a new schema error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a schema error for a specific field.
    #[must_use]
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref field) = self.field {
            write!(f, "Field '{}': {}", field, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for SchemaError {}

/// Types that a provider can be asked to produce.
pub trait StructuredOutput: DeserializeOwned {
    /// The schema raw output must satisfy before decoding.
    fn output_schema() -> OutputSchema;
}

/// Validating decoder for a structured output type.
#[derive(Debug)]
pub struct TypedOutput<T> {
    schema: OutputSchema,
    _marker: PhantomData<T>,
}

impl<T: StructuredOutput> TypedOutput<T> {
    /// Creates a decoder using the type's own schema.
    #[must_use]
    pub fn new() -> Self {
        Self::with_schema(T::output_schema())
    }
}

impl<T: DeserializeOwned> TypedOutput<T> {
    /// Creates a decoder with an explicit schema.
    #[must_use]
    pub fn with_schema(schema: OutputSchema) -> Self {
        Self {
            schema,
            _marker: PhantomData,
        }
    }

    /// Returns the schema.
    #[must_use]
    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    /// Validates `value` against the schema and decodes it.
    pub fn decode(&self, value: serde_json::Value) -> Result<T, SchemaError> {
        self.schema.validate(&value)?;
        serde_json::from_value(value)
            .map_err(|e| SchemaError::new(format!("Deserialization error: {e}")))
    }
}

impl<T: StructuredOutput> Default for TypedOutput<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::SchemaType;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        text: String,
        count: i32,
    }

    impl StructuredOutput for Payload {
        fn output_schema() -> OutputSchema {
            OutputSchema::new("Payload")
                .required("text", SchemaType::non_empty_string())
                .required("count", SchemaType::Number)
        }
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::new("test error");
        assert_eq!(err.to_string(), "test error");

        let field_err = SchemaError::for_field("name", "is required");
        assert_eq!(field_err.to_string(), "Field 'name': is required");
    }

    #[test]
    fn test_decode_valid() {
        let typed: TypedOutput<Payload> = TypedOutput::new();
        let payload = typed
            .decode(serde_json::json!({"text": "hello", "count": 42}))
            .unwrap();
        assert_eq!(
            payload,
            Payload {
                text: "hello".into(),
                count: 42
            }
        );
    }

    #[test]
    fn test_decode_schema_violation() {
        let typed: TypedOutput<Payload> = TypedOutput::default();
        let err = typed.decode(serde_json::json!({"text": "hello"})).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("count"));
    }

    #[test]
    fn test_decode_serde_failure_after_schema() {
        // The schema accepts any number; serde rejects a fraction for i32.
        let typed: TypedOutput<Payload> = TypedOutput::new();
        let err = typed
            .decode(serde_json::json!({"text": "hello", "count": 1.5}))
            .unwrap_err();
        assert!(err.message.starts_with("Deserialization error"));
    }

    #[test]
    fn test_with_schema_overrides() {
        let schema = OutputSchema::new("Loose").required("text", SchemaType::string());
        let typed: TypedOutput<Payload> = TypedOutput::with_schema(schema);
        assert_eq!(typed.schema().name(), "Loose");
    }
}
