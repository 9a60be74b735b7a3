//! Declarative output schemas.
//!
//! A schema describes the JSON object a provider must return: which fields
//! exist, which are required, and what each one holds. Schemas are checked
//! against raw provider output before anything is decoded, and can be
//! rendered as JSON Schema for providers that accept one.

use super::SchemaError;
use serde_json::{Map, Value};

/// The type of a schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    /// A string. `non_empty` rejects blank strings.
    String {
        /// Whether blank strings are rejected.
        non_empty: bool,
    },
    /// Any JSON number.
    Number,
    /// A boolean.
    Boolean,
    /// A string restricted to a fixed set of values.
    Enum(Vec<String>),
    /// An object. `None` accepts any object.
    Object(Option<OutputSchema>),
    /// An array of items with a minimum length.
    Array {
        /// Item type.
        items: Box<SchemaType>,
        /// Minimum number of items.
        min_items: usize,
    },
}

impl SchemaType {
    /// A string that may be blank.
    #[must_use]
    pub const fn string() -> Self {
        Self::String { non_empty: false }
    }

    /// A string that must not be blank.
    #[must_use]
    pub const fn non_empty_string() -> Self {
        Self::String { non_empty: true }
    }

    /// An enum over the given values.
    #[must_use]
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    /// An array of `items` with at least `min_items` entries.
    #[must_use]
    pub fn array_of(items: Self, min_items: usize) -> Self {
        Self::Array {
            items: Box::new(items),
            min_items,
        }
    }

    /// A nested object following `schema`.
    #[must_use]
    pub fn object(schema: OutputSchema) -> Self {
        Self::Object(Some(schema))
    }

    /// Any JSON object.
    #[must_use]
    pub const fn any_object() -> Self {
        Self::Object(None)
    }

    fn check(&self, path: &str, value: &Value) -> Result<(), SchemaError> {
        match (self, value) {
            (Self::String { non_empty }, Value::String(s)) => {
                if *non_empty && s.trim().is_empty() {
                    Err(SchemaError::for_field(path, "must not be blank"))
                } else {
                    Ok(())
                }
            }
            (Self::Number, Value::Number(_)) | (Self::Boolean, Value::Bool(_)) => Ok(()),
            (Self::Enum(allowed), Value::String(s)) => {
                if allowed.iter().any(|a| a == s) {
                    Ok(())
                } else {
                    Err(SchemaError::for_field(
                        path,
                        format!("expected one of [{}], got '{s}'", allowed.join(", ")),
                    ))
                }
            }
            (Self::Object(None), Value::Object(_)) => Ok(()),
            (Self::Object(Some(schema)), Value::Object(map)) => schema.check_object(path, map),
            (Self::Array { items, min_items }, Value::Array(values)) => {
                if values.len() < *min_items {
                    return Err(SchemaError::for_field(
                        path,
                        format!("expected at least {min_items} item(s), got {}", values.len()),
                    ));
                }
                for (i, item) in values.iter().enumerate() {
                    items.check(&format!("{path}[{i}]"), item)?;
                }
                Ok(())
            }
            (expected, actual) => Err(SchemaError::for_field(
                path,
                format!("expected {}, got {}", expected.type_name(), json_type_name(actual)),
            )),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::String { .. } | Self::Enum(_) => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object(_) => "object",
            Self::Array { .. } => "array",
        }
    }

    fn to_json_schema(&self) -> Value {
        match self {
            Self::String { non_empty: true } => {
                serde_json::json!({"type": "string", "minLength": 1})
            }
            Self::String { non_empty: false } => serde_json::json!({"type": "string"}),
            Self::Number => serde_json::json!({"type": "number"}),
            Self::Boolean => serde_json::json!({"type": "boolean"}),
            Self::Enum(values) => serde_json::json!({"type": "string", "enum": values}),
            Self::Object(None) => serde_json::json!({"type": "object"}),
            Self::Object(Some(schema)) => schema.to_json_schema(),
            Self::Array { items, min_items } => serde_json::json!({
                "type": "array",
                "items": items.to_json_schema(),
                "minItems": min_items,
            }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One field of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name as it appears in JSON.
    pub name: String,
    /// Field type.
    pub ty: SchemaType,
    /// Whether the field must be present and non-null.
    pub required: bool,
    /// Optional description, rendered into JSON Schema.
    pub description: Option<String>,
}

/// A declarative description of a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl OutputSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a required field.
    #[must_use]
    pub fn required(mut self, name: impl Into<String>, ty: SchemaType) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            ty,
            required: true,
            description: None,
        });
        self
    }

    /// Adds an optional field. `null` is accepted for optional fields.
    #[must_use]
    pub fn optional(mut self, name: impl Into<String>, ty: SchemaType) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            ty,
            required: false,
            description: None,
        });
        self
    }

    /// Describes the most recently added field.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.description = Some(description.into());
        }
        self
    }

    /// Returns the schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared fields.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Validates a raw value against the schema.
    ///
    /// Unknown fields are ignored.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaError> {
        match value {
            Value::Object(map) => self.check_object("", map),
            other => Err(SchemaError::new(format!(
                "{} must be an object, got {}",
                self.name,
                json_type_name(other)
            ))),
        }
    }

    fn check_object(&self, prefix: &str, map: &Map<String, Value>) -> Result<(), SchemaError> {
        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{prefix}.{}", field.name)
            };

            match map.get(&field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(SchemaError::for_field(path, "Required field is missing"));
                }
                None | Some(Value::Null) => {}
                Some(value) => field.ty.check(&path, value)?,
            }
        }
        Ok(())
    }

    /// Renders the schema as JSON Schema.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut prop = field.ty.to_json_schema();
            if let (Some(desc), Value::Object(obj)) = (&field.description, &mut prop) {
                obj.insert("description".to_string(), Value::String(desc.clone()));
            }
            properties.insert(field.name.clone(), prop);
            if field.required {
                required.push(Value::String(field.name.clone()));
            }
        }

        serde_json::json!({
            "title": self.name,
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step_schema() -> OutputSchema {
        OutputSchema::new("Step")
            .required("type", SchemaType::one_of(["TRIGGER", "ACTION"]))
            .optional("pieceName", SchemaType::non_empty_string())
    }

    fn plan_schema() -> OutputSchema {
        OutputSchema::new("Plan")
            .required("name", SchemaType::non_empty_string())
            .required("steps", SchemaType::array_of(SchemaType::object(step_schema()), 1))
    }

    #[test]
    fn test_valid_object_passes() {
        let value = json!({"name": "x", "steps": [{"type": "TRIGGER", "pieceName": "sheets"}]});
        assert!(plan_schema().validate(&value).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let err = plan_schema().validate(&json!({"steps": []})).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("name"));
    }

    #[test]
    fn test_null_required_field_is_missing() {
        let err = plan_schema()
            .validate(&json!({"name": null, "steps": []}))
            .unwrap_err();
        assert_eq!(err.field.as_deref(), Some("name"));
    }

    #[test]
    fn test_null_optional_field_is_accepted() {
        let value = json!({"name": "x", "steps": [{"type": "ACTION", "pieceName": null}]});
        assert!(plan_schema().validate(&value).is_ok());
    }

    #[test]
    fn test_min_items() {
        let err = plan_schema()
            .validate(&json!({"name": "x", "steps": []}))
            .unwrap_err();
        assert_eq!(err.field.as_deref(), Some("steps"));
        assert!(err.message.contains("at least 1"));
    }

    #[test]
    fn test_nested_path_in_error() {
        let value = json!({"name": "x", "steps": [{"type": "TRIGGER"}, {"type": "LOOP"}]});
        let err = plan_schema().validate(&value).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("steps[1].type"));
    }

    #[test]
    fn test_wrong_type() {
        let err = plan_schema()
            .validate(&json!({"name": 3, "steps": []}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Field 'name': expected string, got number");
    }

    #[test]
    fn test_blank_string_rejected() {
        let err = plan_schema()
            .validate(&json!({"name": "  ", "steps": [{"type": "TRIGGER"}]}))
            .unwrap_err();
        assert_eq!(err.field.as_deref(), Some("name"));
    }

    #[test]
    fn test_non_object_root() {
        let err = plan_schema().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.field, None);
        assert!(err.message.contains("Plan must be an object"));
    }

    #[test]
    fn test_json_schema_rendering() {
        let rendered = plan_schema().to_json_schema();
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["required"], json!(["name", "steps"]));
        assert_eq!(rendered["properties"]["steps"]["minItems"], 1);
        assert_eq!(
            rendered["properties"]["steps"]["items"]["properties"]["type"]["enum"],
            json!(["TRIGGER", "ACTION"])
        );
    }

    #[test]
    fn test_describe_attaches_to_last_field() {
        let schema = OutputSchema::new("S")
            .required("a", SchemaType::string())
            .describe("first field");
        assert_eq!(schema.fields()[0].description.as_deref(), Some("first field"));
        assert_eq!(
            schema.to_json_schema()["properties"]["a"]["description"],
            "first field"
        );
    }
}
