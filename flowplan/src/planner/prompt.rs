//! Planning prompt rendering.

use super::PlanOptions;
use crate::core::{ContextItem, ExplicitStepSequence};

const PLANNER_PREAMBLE: &str =
    "You are a planner agent that creates high-level plans for automation flows.";

/// Guidance used when the caller does not dictate the step sequence.
pub const GENERIC_GUIDANCE: &str = "Create a high-level plan that:
1. Starts with a trigger step
2. Includes necessary action steps
3. Uses router steps only when conditional logic is needed";

const PLAN_REQUIREMENTS: &str = "The plan should have:
- A descriptive name that summarizes what it does
- A clear description of its purpose
- A sequence of steps with their types and piece information";

const PLAN_RULES: &str = "IMPORTANT:
- First try to use piece triggers and actions directly
- Only use ROUTER if the logic cannot be handled by piece capabilities
- Keep the plan as simple as possible while meeting the requirements";

const FOLLOW_SEQUENCE_RULE: &str = "- Follow the exact step sequence provided above";

fn pieces_block(context: &[ContextItem]) -> String {
    let lines = context
        .iter()
        .map(ContextItem::prompt_line)
        .collect::<Vec<_>>()
        .join("\n");
    format!("Available pieces:\n{lines}")
}

fn sequence_block(sequence: &ExplicitStepSequence) -> String {
    format!("Follow this exact step sequence:\n{}", sequence.numbered_list())
}

/// Renders the text sent to the provider for coarse planning.
///
/// With a custom prompt the default instructions are dropped entirely;
/// the custom text is followed by the available pieces, the user request
/// and, if present, the step sequence, in that order.
#[must_use]
pub fn render_plan_prompt(prompt: &str, context: &[ContextItem], options: &PlanOptions) -> String {
    let sequence = options.step_sequence();

    if let Some(custom) = options.custom_prompt.as_deref() {
        let mut text = format!(
            "{custom}\n\n{}\n\nUser request: {prompt}",
            pieces_block(context)
        );
        if let Some(seq) = sequence {
            text.push_str("\n\n");
            text.push_str(&sequence_block(seq));
        }
        return text;
    }

    let mut sections = vec![
        PLANNER_PREAMBLE.to_string(),
        pieces_block(context),
        format!("User request: {prompt}"),
        sequence.map_or_else(|| GENERIC_GUIDANCE.to_string(), sequence_block),
        PLAN_REQUIREMENTS.to_string(),
    ];

    let mut rules = PLAN_RULES.to_string();
    if sequence.is_some() {
        rules.push('\n');
        rules.push_str(FOLLOW_SEQUENCE_RULE);
    }
    sections.push(rules);

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StepKind;
    use pretty_assertions::assert_eq;

    fn context() -> Vec<ContextItem> {
        vec![
            ContextItem::new("google-sheets", "Spreadsheet triggers and actions"),
            ContextItem::new("slack", "Send messages"),
        ]
    }

    fn sequence() -> ExplicitStepSequence {
        ExplicitStepSequence::default()
            .step(StepKind::Trigger, "When a row is added")
            .step(StepKind::Action, "Post the row to Slack")
    }

    #[test]
    fn test_default_prompt_sections() {
        let text = render_plan_prompt("Notify me", &context(), &PlanOptions::new());

        assert!(text.starts_with(PLANNER_PREAMBLE));
        assert!(text.contains(
            "Available pieces:\n\
             - google-sheets: Spreadsheet triggers and actions\n\
             - slack: Send messages"
        ));
        assert!(text.contains("User request: Notify me"));
        assert!(text.contains(GENERIC_GUIDANCE));
        assert!(text.contains(PLAN_REQUIREMENTS));
        assert!(!text.contains(FOLLOW_SEQUENCE_RULE));
    }

    #[test]
    fn test_default_prompt_with_sequence() {
        let options = PlanOptions::new().with_explicit_steps(sequence());
        let text = render_plan_prompt("Notify me", &context(), &options);

        assert!(text.contains(
            "Follow this exact step sequence:\n\
             1. [TRIGGER] When a row is added\n\
             2. [ACTION] Post the row to Slack"
        ));
        assert!(text.contains(FOLLOW_SEQUENCE_RULE));
        assert!(!text.contains(GENERIC_GUIDANCE));
    }

    #[test]
    fn test_custom_prompt_replaces_template() {
        let options = PlanOptions::new()
            .with_custom_prompt("Plan tersely.")
            .with_explicit_steps(sequence());
        let text = render_plan_prompt("Notify me", &context(), &options);

        assert_eq!(
            text,
            "Plan tersely.\n\n\
             Available pieces:\n\
             - google-sheets: Spreadsheet triggers and actions\n\
             - slack: Send messages\n\n\
             User request: Notify me\n\n\
             Follow this exact step sequence:\n\
             1. [TRIGGER] When a row is added\n\
             2. [ACTION] Post the row to Slack"
        );
        assert!(!text.contains(GENERIC_GUIDANCE));
        assert!(!text.contains(PLANNER_PREAMBLE));
    }

    #[test]
    fn test_custom_prompt_without_sequence() {
        let options = PlanOptions::new().with_custom_prompt("Plan tersely.");
        let text = render_plan_prompt("Notify me", &[], &options);

        assert_eq!(text, "Plan tersely.\n\nAvailable pieces:\n\n\nUser request: Notify me");
    }

    #[test]
    fn test_section_order() {
        let text = render_plan_prompt("Notify me", &context(), &PlanOptions::new());
        let pieces = text.find("Available pieces:").unwrap();
        let request = text.find("User request:").unwrap();
        let guidance = text.find(GENERIC_GUIDANCE).unwrap();
        let rules = text.find("IMPORTANT:").unwrap();

        assert!(pieces < request && request < guidance && guidance < rules);
    }
}
