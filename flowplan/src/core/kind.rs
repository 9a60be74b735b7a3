//! Step kind enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a flow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepKind {
    /// The step that starts the flow.
    Trigger,
    /// A step that calls a piece action.
    Action,
    /// A step that branches on a condition.
    Router,
}

impl StepKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 3] = [Self::Trigger, Self::Action, Self::Router];

    /// Returns the wire name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trigger => "TRIGGER",
            Self::Action => "ACTION",
            Self::Router => "ROUTER",
        }
    }

    /// Returns true if steps of this kind reference a piece.
    #[must_use]
    pub const fn requires_piece(&self) -> bool {
        matches!(self, Self::Trigger | Self::Action)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRIGGER" => Ok(Self::Trigger),
            "ACTION" => Ok(Self::Action),
            "ROUTER" => Ok(Self::Router),
            other => Err(format!("unknown step kind: {other}")),
        }
    }
}
