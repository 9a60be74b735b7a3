//! Catalog of pieces, their triggers and their actions.

use crate::core::{ContextItem, StepKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One input property of a trigger or action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    /// Property key in the step input.
    pub name: String,
    /// What the property configures.
    #[serde(default)]
    pub description: String,
    /// Whether the property must be set.
    #[serde(default)]
    pub required: bool,
    /// Value used when nothing else is provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropertyDefinition {
    /// Creates an optional property with no default.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required: false,
            default: None,
        }
    }

    /// Marks the property as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// A trigger or an action exposed by a piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDefinition {
    /// Identifier used in plans.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// What the operation does.
    #[serde(default)]
    pub description: String,
    /// Declared input properties.
    #[serde(default)]
    pub props: Vec<PropertyDefinition>,
}

impl OperationDefinition {
    /// Creates an operation with no properties.
    #[must_use]
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: String::new(),
            props: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds an input property.
    #[must_use]
    pub fn with_prop(mut self, prop: PropertyDefinition) -> Self {
        self.props.push(prop);
        self
    }

    /// Input built from the declared property defaults.
    #[must_use]
    pub fn default_input(&self) -> Map<String, Value> {
        self.props
            .iter()
            .filter_map(|p| p.default.clone().map(|v| (p.name.clone(), v)))
            .collect()
    }
}

/// An integration that offers triggers and actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceDefinition {
    /// Identifier used in plans.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// What the piece integrates with.
    #[serde(default)]
    pub description: String,
    /// Logo shown next to the piece.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Triggers the piece offers.
    #[serde(default)]
    pub triggers: Vec<OperationDefinition>,
    /// Actions the piece offers.
    #[serde(default)]
    pub actions: Vec<OperationDefinition>,
}

impl PieceDefinition {
    /// Creates a piece with no operations.
    #[must_use]
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: String::new(),
            logo_url: None,
            triggers: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the logo URL.
    #[must_use]
    pub fn with_logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    /// Adds a trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: OperationDefinition) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Adds an action.
    #[must_use]
    pub fn with_action(mut self, action: OperationDefinition) -> Self {
        self.actions.push(action);
        self
    }

    /// Operations of the given kind. Routers have none.
    #[must_use]
    pub fn operations(&self, kind: StepKind) -> &[OperationDefinition] {
        match kind {
            StepKind::Trigger => &self.triggers,
            StepKind::Action => &self.actions,
            StepKind::Router => &[],
        }
    }

    /// Looks up an operation of the given kind by name.
    #[must_use]
    pub fn operation(&self, kind: StepKind, name: &str) -> Option<&OperationDefinition> {
        self.operations(kind).iter().find(|op| op.name == name)
    }

    /// Renders the piece as a retrieval context item.
    #[must_use]
    pub fn to_context_item(&self) -> ContextItem {
        let mut content = if self.description.is_empty() {
            self.display_name.clone()
        } else {
            self.description.clone()
        };
        let operations: Vec<&str> = self
            .triggers
            .iter()
            .chain(&self.actions)
            .map(|op| op.name.as_str())
            .collect();
        if !operations.is_empty() {
            content.push_str(" (");
            content.push_str(&operations.join(", "));
            content.push(')');
        }

        let item = ContextItem::new(&self.name, content);
        match &self.logo_url {
            Some(url) => item.with_logo_url(url),
            None => item,
        }
    }
}

/// Pieces available to a planner, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PieceCatalog {
    pieces: BTreeMap<String, PieceDefinition>,
}

impl PieceCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog from piece definitions. Later duplicates win.
    #[must_use]
    pub fn from_pieces(pieces: impl IntoIterator<Item = PieceDefinition>) -> Self {
        pieces.into_iter().fold(Self::new(), Self::with_piece)
    }

    /// Parses a JSON array of piece definitions.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let pieces: Vec<PieceDefinition> = serde_json::from_str(json)?;
        Ok(Self::from_pieces(pieces))
    }

    /// Adds a piece.
    #[must_use]
    pub fn with_piece(mut self, piece: PieceDefinition) -> Self {
        self.pieces.insert(piece.name.clone(), piece);
        self
    }

    /// Looks up a piece by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PieceDefinition> {
        self.pieces.get(name)
    }

    /// Returns piece names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.pieces.keys().map(String::as_str).collect()
    }

    /// Returns the number of pieces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Renders every piece as a retrieval context item.
    #[must_use]
    pub fn context_items(&self) -> Vec<ContextItem> {
        self.pieces.values().map(PieceDefinition::to_context_item).collect()
    }
}
