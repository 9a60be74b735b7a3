//! Sample pieces, context and plans.

use serde_json::json;

use crate::core::ContextItem;
use crate::materializer::{OperationDefinition, PieceCatalog, PieceDefinition, PropertyDefinition};

/// A small catalog with a spreadsheet piece, a chat piece and a mail piece.
#[must_use]
pub fn sample_catalog() -> PieceCatalog {
    PieceCatalog::new()
        .with_piece(
            PieceDefinition::new("google-sheets", "Google Sheets")
                .with_description("Spreadsheets")
                .with_logo_url("https://cdn.example.com/pieces/google-sheets.png")
                .with_trigger(
                    OperationDefinition::new("new_row", "New Row")
                        .with_description("Fires when a row is added")
                        .with_prop(PropertyDefinition::new("spreadsheet_id").required())
                        .with_prop(PropertyDefinition::new("sheet").with_default(json!("Sheet1"))),
                )
                .with_action(
                    OperationDefinition::new("insert_row", "Insert Row")
                        .with_prop(PropertyDefinition::new("spreadsheet_id").required())
                        .with_prop(PropertyDefinition::new("values").required()),
                ),
        )
        .with_piece(
            PieceDefinition::new("slack", "Slack")
                .with_description("Team messaging")
                .with_logo_url("https://cdn.example.com/pieces/slack.png")
                .with_action(
                    OperationDefinition::new("send_message", "Send Message")
                        .with_description("Posts a message to a channel")
                        .with_prop(
                            PropertyDefinition::new("channel")
                                .required()
                                .with_description("Channel to post to"),
                        )
                        .with_prop(
                            PropertyDefinition::new("text")
                                .required()
                                .with_description("Message body"),
                        )
                        .with_prop(PropertyDefinition::new("unfurl").with_default(json!(true))),
                ),
        )
        .with_piece(
            PieceDefinition::new("gmail", "Gmail")
                .with_description("Email")
                .with_action(
                    OperationDefinition::new("send_email", "Send Email")
                        .with_prop(PropertyDefinition::new("to").required())
                        .with_prop(PropertyDefinition::new("subject").required())
                        .with_prop(PropertyDefinition::new("body")),
                ),
        )
}

/// Context a retriever would return for a spreadsheet-to-chat request.
#[must_use]
pub fn sample_context() -> Vec<ContextItem> {
    vec![
        ContextItem::new("slack", "Team messaging (send_message)")
            .with_similarity(0.92)
            .with_logo_url("https://cdn.example.com/pieces/slack.png"),
        ContextItem::new("google-sheets", "Spreadsheets (new_row, insert_row)")
            .with_similarity(0.88)
            .with_logo_url("https://cdn.example.com/pieces/google-sheets.png"),
        ContextItem::new("gmail", "Email (send_email)").with_similarity(0.31),
    ]
}

/// Provider output for "post new spreadsheet rows to Slack".
#[must_use]
pub fn sheets_to_slack_plan() -> serde_json::Value {
    json!({
        "name": "Spreadsheet rows to Slack",
        "description": "Posts every new spreadsheet row to a Slack channel",
        "steps": [
            {"type": "TRIGGER", "pieceName": "google-sheets", "actionOrTriggerName": "new_row"},
            {"type": "ACTION", "pieceName": "slack", "actionOrTriggerName": "send_message"}
        ]
    })
}

/// Provider output for a trigger, a router and an action.
#[must_use]
pub fn three_step_plan() -> serde_json::Value {
    json!({
        "name": "Large orders",
        "description": "Emails sales about large orders",
        "steps": [
            {"type": "TRIGGER", "pieceName": "google-sheets", "actionOrTriggerName": "new_row"},
            {"type": "ROUTER", "condition": "{{trigger.amount}} > 1000"},
            {"type": "ACTION", "pieceName": "gmail", "actionOrTriggerName": "send_email"}
        ]
    })
}
