//! Error types for the flowplan pipeline.
//!
//! Every stage has its own error type. All of them are fatal to a planning
//! run and surface to the caller wrapped in [`PlannerError`].

use crate::contracts::SchemaError;
use crate::core::StepKind;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for a planning run.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Context retrieval failed.
    #[error("{0}")]
    Retrieval(#[from] RetrievalError),

    /// Coarse plan generation failed.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// A planned step could not be materialized.
    #[error("Step {index} could not be materialized: {source}")]
    Materialization {
        /// Position of the failing intent in the plan.
        index: usize,
        /// The underlying error.
        #[source]
        source: MaterializationError,
    },

    /// The caller supplied unusable input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The pipeline attempted an illegal state transition.
    #[error("Invalid pipeline transition: {from} -> {to}")]
    InvalidTransition {
        /// State the pipeline was in.
        from: String,
        /// State it tried to enter.
        to: String,
    },
}

impl PlannerError {
    /// Returns the stage at which the run failed.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Retrieval(_) => "retrieval",
            Self::Generation(_) => "generation",
            Self::Materialization { .. } => "materialization",
            Self::InvalidInput(_) => "input",
            Self::InvalidTransition { .. } => "pipeline",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("stage".to_string(), json!(self.stage()));
        map.insert("message".to_string(), json!(self.to_string()));

        match self {
            Self::Materialization { index, source } => {
                map.insert("step_index".to_string(), json!(index));
                map.insert("type".to_string(), json!(source.kind()));
            }
            Self::Generation(err) => {
                map.insert("type".to_string(), json!(err.kind()));
            }
            Self::Retrieval(err) => {
                map.insert("type".to_string(), json!(err.kind()));
            }
            Self::InvalidInput(_) => {
                map.insert("type".to_string(), json!("InvalidInput"));
            }
            Self::InvalidTransition { .. } => {
                map.insert("type".to_string(), json!("InvalidTransition"));
            }
        }

        map
    }
}

/// Errors raised by a context retriever.
#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    /// The retrieval service could not be reached.
    #[error("Retrieval service unavailable: {0}")]
    Unavailable(String),

    /// The retrieval service answered with an error.
    #[error("Retrieval failed: {0}")]
    Backend(String),

    /// The retrieval call timed out.
    #[error("Retrieval timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },
}

impl RetrievalError {
    /// Short name of the variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "RetrievalUnavailable",
            Self::Backend(_) => "RetrievalBackend",
            Self::Timeout { .. } => "RetrievalTimeout",
        }
    }
}

/// Errors raised by a generation provider for a single call.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The request could not be sent.
    #[error("Provider transport error: {0}")]
    Transport(String),

    /// The provider asked us to slow down.
    #[error("Provider rate limited the request")]
    RateLimited,

    /// The provider returned a server error.
    #[error("Provider returned status {status}: {message}")]
    Server {
        /// HTTP-like status code.
        status: u16,
        /// Message from the provider.
        message: String,
    },

    /// The call timed out.
    #[error("Provider call timed out")]
    Timeout,

    /// The provider answered with something that is not a JSON object.
    #[error("Provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Returns true if retrying the same call may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::RateLimited | Self::Timeout => true,
            Self::Server { status, .. } => matches!(*status, 408 | 429 | 500 | 502 | 503 | 504),
            Self::InvalidResponse(_) => false,
        }
    }
}

/// Errors raised while producing a structured object from a provider.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// The provider failed, after retries if the failure was transient.
    #[error("Generation failed after {attempts} attempt(s): {source}")]
    Provider {
        /// Number of calls made.
        attempts: usize,
        /// The last provider error.
        #[source]
        source: ProviderError,
    },

    /// The output did not satisfy the schema.
    #[error("Generated output violates schema: {0}")]
    Schema(#[from] SchemaError),

    /// The plan does not follow the caller-supplied step sequence.
    #[error(
        "Plan does not follow the requested step sequence: expected [{}], got [{}]",
        join_kinds(.expected),
        join_kinds(.actual)
    )]
    SequenceMismatch {
        /// Kinds the caller asked for.
        expected: Vec<StepKind>,
        /// Kinds the provider produced.
        actual: Vec<StepKind>,
    },
}

impl GenerationError {
    /// Short name of the variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Provider { .. } => "GenerationProvider",
            Self::Schema(_) => "GenerationSchema",
            Self::SequenceMismatch { .. } => "GenerationSequenceMismatch",
        }
    }
}

fn join_kinds(kinds: &[StepKind]) -> String {
    kinds
        .iter()
        .map(StepKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while turning a step intent into a concrete step.
#[derive(Debug, Clone, Error)]
pub enum MaterializationError {
    /// The intent names no piece but its kind needs one.
    #[error("{kind} step does not reference a piece")]
    MissingPiece {
        /// The step kind.
        kind: StepKind,
    },

    /// The named piece is not in the catalog.
    #[error("Unknown piece: {piece}")]
    UnknownPiece {
        /// The piece name.
        piece: String,
    },

    /// The named action does not exist on the piece.
    #[error("Piece '{piece}' has no action '{action}'")]
    UnknownAction {
        /// The piece name.
        piece: String,
        /// The action name.
        action: String,
    },

    /// The named trigger does not exist on the piece.
    #[error("Piece '{piece}' has no trigger '{trigger}'")]
    UnknownTrigger {
        /// The piece name.
        piece: String,
        /// The trigger name.
        trigger: String,
    },

    /// A router intent has no usable condition.
    #[error("Router step has no usable condition")]
    MissingCondition,

    /// The step input references a step that was not created before it.
    #[error("Input '{property}' references unknown step '{reference}'")]
    UnknownReference {
        /// The input property holding the reference.
        property: String,
        /// The referenced step name.
        reference: String,
    },

    /// Generating the step configuration failed.
    #[error("Step configuration could not be generated: {0}")]
    Generation(#[from] GenerationError),
}

impl MaterializationError {
    /// Short name of the variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingPiece { .. } => "MissingPiece",
            Self::UnknownPiece { .. } => "UnknownPiece",
            Self::UnknownAction { .. } => "UnknownAction",
            Self::UnknownTrigger { .. } => "UnknownTrigger",
            Self::MissingCondition => "MissingCondition",
            Self::UnknownReference { .. } => "UnknownReference",
            Self::Generation(_) => "StepGeneration",
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid value for '{field}': {message}")]
    Invalid {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

impl ConfigError {
    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::RateLimited.is_transient());
        assert!(ProviderError::Timeout.is_transient());
        assert!(ProviderError::Transport("reset".into()).is_transient());
        let server = |status| ProviderError::Server {
            status,
            message: String::new(),
        };
        assert!(server(503).is_transient());
        assert!(!server(400).is_transient());
        assert!(!ProviderError::InvalidResponse("not json".into()).is_transient());
    }

    #[test]
    fn test_sequence_mismatch_message() {
        let err = GenerationError::SequenceMismatch {
            expected: vec![StepKind::Trigger, StepKind::Action],
            actual: vec![StepKind::Trigger],
        };
        let message = err.to_string();
        assert!(message.starts_with("Plan does not follow the requested step sequence"));
        assert!(message.ends_with("expected [TRIGGER, ACTION], got [TRIGGER]"));
    }

    #[test]
    fn test_planner_error_stage() {
        let err = PlannerError::from(RetrievalError::Unavailable("down".into()));
        assert_eq!(err.stage(), "retrieval");

        let err = PlannerError::Materialization {
            index: 2,
            source: MaterializationError::MissingCondition,
        };
        assert_eq!(err.stage(), "materialization");
        assert_eq!(
            err.to_string(),
            "Step 2 could not be materialized: Router step has no usable condition"
        );
    }

    #[test]
    fn test_planner_error_to_dict() {
        let err = PlannerError::Materialization {
            index: 1,
            source: MaterializationError::UnknownPiece {
                piece: "ghost".into(),
            },
        };
        let dict = err.to_dict();

        assert_eq!(dict.get("stage").unwrap(), "materialization");
        assert_eq!(dict.get("type").unwrap(), "UnknownPiece");
        assert_eq!(dict.get("step_index").unwrap(), 1);
    }

    #[test]
    fn test_generation_error_from_schema() {
        let err: GenerationError =
            SchemaError::for_field("steps", "Required field is missing").into();
        assert_eq!(err.kind(), "GenerationSchema");
        assert!(err.to_string().contains("Field 'steps'"));
    }

    #[test]
    fn test_config_error_invalid() {
        let err = ConfigError::invalid("temperature", "must be within [0, 2]");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'temperature': must be within [0, 2]"
        );
    }
}
