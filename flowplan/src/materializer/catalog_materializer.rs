//! Catalog-backed step materializer.

use super::{OperationDefinition, PieceCatalog, PieceDefinition, StepMaterializer, StepRequest};
use crate::contracts::{OutputSchema, SchemaType, StructuredOutput};
use crate::core::{MaterializedStep, PlannedStepIntent, StepKind};
use crate::errors::MaterializationError;
use crate::generation::{generate_structured, GenerationProvider, GenerationSettings, RetryConfig};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};
use tracing::debug;

const TRIGGER_STEP_NAME: &str = "trigger";

const STEP_INPUT_RULES: &str = "\
Reference outputs of earlier steps with {{step_name.field}}, \
for example {{trigger.body}} or {{step_1.id}}.
Only reference steps listed above.
Return an object with an \"input\" field holding the property values.";

/// Schema for generated step input.
#[must_use]
pub fn step_input_schema() -> OutputSchema {
    OutputSchema::new("StepInput")
        .required("input", SchemaType::any_object())
        .describe("Property values keyed by property name")
}

#[derive(Debug, Deserialize)]
struct GeneratedInput {
    input: Map<String, Value>,
}

impl StructuredOutput for GeneratedInput {
    fn output_schema() -> OutputSchema {
        step_input_schema()
    }
}

struct InputGenerator {
    provider: Arc<dyn GenerationProvider>,
    settings: GenerationSettings,
    retry: RetryConfig,
}

/// Resolves intents against a [`PieceCatalog`].
///
/// Without a provider, step input holds the declared property defaults.
/// With one, the provider fills in the input and its values override the
/// defaults.
pub struct CatalogStepMaterializer {
    catalog: Arc<PieceCatalog>,
    generator: Option<InputGenerator>,
}

impl CatalogStepMaterializer {
    /// Creates a materializer that uses property defaults only.
    #[must_use]
    pub fn new(catalog: Arc<PieceCatalog>) -> Self {
        Self {
            catalog,
            generator: None,
        }
    }

    /// Generates step input with `provider`.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.generator = Some(InputGenerator {
            provider,
            settings: GenerationSettings::default().with_max_output_tokens(2000),
            retry: RetryConfig::default(),
        });
        self
    }

    /// Sets the settings for input generation. Has no effect without a provider.
    #[must_use]
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        if let Some(generator) = self.generator.as_mut() {
            generator.settings = settings;
        }
        self
    }

    /// Sets the retry delays for input generation. Has no effect without a provider.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        if let Some(generator) = self.generator.as_mut() {
            generator.retry = retry;
        }
        self
    }

    /// Returns the catalog.
    #[must_use]
    pub fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }

    fn resolve(
        &self,
        intent: &PlannedStepIntent,
    ) -> Result<(&PieceDefinition, &OperationDefinition), MaterializationError> {
        let piece_name = non_blank(intent.piece_name.as_deref())
            .ok_or(MaterializationError::MissingPiece { kind: intent.kind })?;
        let piece = self
            .catalog
            .get(piece_name)
            .ok_or_else(|| MaterializationError::UnknownPiece {
                piece: piece_name.to_string(),
            })?;

        let operation = match non_blank(intent.action_or_trigger_name.as_deref()) {
            Some(name) => piece.operation(intent.kind, name),
            // A piece with a single operation of the kind needs no name.
            None => match piece.operations(intent.kind) {
                [only] => Some(only),
                _ => None,
            },
        };

        operation.map(|op| (piece, op)).ok_or_else(|| {
            let name = intent.action_or_trigger_name.clone().unwrap_or_default();
            if intent.kind == StepKind::Trigger {
                MaterializationError::UnknownTrigger {
                    piece: piece.name.clone(),
                    trigger: name,
                }
            } else {
                MaterializationError::UnknownAction {
                    piece: piece.name.clone(),
                    action: name,
                }
            }
        })
    }

    async fn build_input(
        &self,
        request: &StepRequest<'_>,
        piece: &PieceDefinition,
        operation: &OperationDefinition,
    ) -> Result<Map<String, Value>, MaterializationError> {
        let mut input = operation.default_input();

        if let Some(generator) = &self.generator {
            let prompt = render_step_prompt(request, piece, operation);
            let generated: GeneratedInput = generate_structured(
                generator.provider.as_ref(),
                prompt,
                &generator.settings,
                &generator.retry,
            )
            .await?;
            input.extend(generated.input);
        }

        check_references(&input, request.previous_steps)?;
        Ok(input)
    }
}

#[async_trait]
impl StepMaterializer for CatalogStepMaterializer {
    async fn create_step(
        &self,
        request: StepRequest<'_>,
    ) -> Result<MaterializedStep, MaterializationError> {
        let intent = request.intent;
        let name = step_name(intent.kind, request.previous_steps);

        let step = if intent.kind == StepKind::Router {
            let condition = non_blank(intent.condition.as_deref())
                .ok_or(MaterializationError::MissingCondition)?;
            MaterializedStep::new(name, StepKind::Router, "Router").with_condition(condition)
        } else {
            let (piece, operation) = self.resolve(intent)?;
            let input = self.build_input(&request, piece, operation).await?;
            let mut step = MaterializedStep::new(name, intent.kind, &operation.display_name)
                .with_binding(&piece.name, &operation.name);
            step.input = input;
            step
        };

        debug!(
            step_index = request.index,
            step = %step.name,
            kind = %step.kind,
            inputs = step.input.len(),
            "Step materialized"
        );
        Ok(step)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The first trigger is named `trigger`; every other step is `step_{n}`,
/// counting non-trigger-named steps from 1.
fn step_name(kind: StepKind, previous: &[MaterializedStep]) -> String {
    let has_trigger = previous.iter().any(|s| s.name == TRIGGER_STEP_NAME);
    if kind == StepKind::Trigger && !has_trigger {
        return TRIGGER_STEP_NAME.to_string();
    }
    let numbered = previous.iter().filter(|s| s.name != TRIGGER_STEP_NAME).count();
    format!("step_{}", numbered + 1)
}

fn render_step_prompt(
    request: &StepRequest<'_>,
    piece: &PieceDefinition,
    operation: &OperationDefinition,
) -> String {
    let mut out = String::from("Configure the input of one step of an automation flow.\n\n");
    let _ = writeln!(
        out,
        "Step: {} [{}] from piece {} ({})",
        operation.display_name, request.intent.kind, piece.display_name, piece.name
    );
    let _ = writeln!(out, "Operation: {}", operation.name);
    if !operation.description.is_empty() {
        let _ = writeln!(out, "Description: {}", operation.description);
    }

    out.push_str("\nProperties:\n");
    if operation.props.is_empty() {
        out.push_str("None\n");
    }
    for prop in &operation.props {
        let required = if prop.required { " (required)" } else { "" };
        let _ = writeln!(out, "- {}{required}: {}", prop.name, prop.description);
    }

    out.push_str("\nPrevious steps:\n");
    if request.previous_steps.is_empty() {
        out.push_str("None\n");
    }
    for step in request.previous_steps {
        let binding = match (&step.piece_name, &step.action_or_trigger_name) {
            (Some(piece), Some(op)) => format!(" {piece}/{op}"),
            _ => String::new(),
        };
        let _ = writeln!(out, "- {}: {} [{}]{binding}", step.name, step.display_name, step.kind);
    }

    out.push('\n');
    out.push_str(STEP_INPUT_RULES);
    out
}

fn step_reference() -> &'static Regex {
    static REFERENCE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    REFERENCE.get_or_init(|| {
        Regex::new(r"\{\{\s*(trigger|step_\d+)\b[^}]*\}\}").expect("reference pattern is valid")
    })
}

fn check_references(
    input: &Map<String, Value>,
    previous: &[MaterializedStep],
) -> Result<(), MaterializationError> {
    for (property, value) in input {
        check_value(property, value, previous)?;
    }
    Ok(())
}

fn check_value(
    property: &str,
    value: &Value,
    previous: &[MaterializedStep],
) -> Result<(), MaterializationError> {
    match value {
        Value::String(text) => {
            for captures in step_reference().captures_iter(text) {
                let reference = &captures[1];
                if !previous.iter().any(|s| s.name == reference) {
                    return Err(MaterializationError::UnknownReference {
                        property: property.to_string(),
                        reference: reference.to_string(),
                    });
                }
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(|v| check_value(property, v, previous)),
        Value::Object(map) => map.values().try_for_each(|v| check_value(property, v, previous)),
        _ => Ok(()),
    }
}
