//! Rendering of the agent's instruction document.
//!
//! The transcript and scratchpad are carried as ordered message lists by the
//! agent itself; the only string substitution here is the framework choice.

const SYSTEM_TEMPLATE: &str = include_str!("prompts/system.md");

const FRAMEWORK_PLACEHOLDER: &str = "{framework_choice}";

/// Substitute the chosen framework label into the static instruction
/// document. Pure; the same inputs always render the same prompt.
pub fn render_system_prompt(framework: &str) -> String {
    SYSTEM_TEMPLATE.replace(FRAMEWORK_PLACEHOLDER, framework)
}

#[cfg(test)]
mod tests {
    use super::{FRAMEWORK_PLACEHOLDER, render_system_prompt};
    use crate::frameworks;

    #[test]
    fn test_substitutes_framework() {
        let label = frameworks::CATALOG[10].label();
        let prompt = render_system_prompt(&label);

        assert!(prompt.contains(&label));
        assert!(!prompt.contains(FRAMEWORK_PLACEHOLDER));
    }

    #[test]
    fn test_deterministic() {
        let prompt = render_system_prompt(frameworks::AUTO);
        assert_eq!(prompt, render_system_prompt(frameworks::AUTO));
    }

    #[test]
    fn test_auto_changes_text_not_structure() {
        let auto = render_system_prompt(frameworks::AUTO);
        let fixed = render_system_prompt(&frameworks::CATALOG[0].label());

        assert_ne!(auto, fixed);
        assert_eq!(auto.lines().count(), fixed.lines().count());
    }
}
