//! Interactive Prompts
//!
//! Thin layer over `inquire` so the wizard can be driven by a mock in tests.

use std::fmt;

use inquire::{
    InquireError, Select, Text,
    ui::{Color, RenderConfig, Styled},
};

use crate::errors::{KcommitError, Result};

/// An entry of a selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub title: String,
    pub description: String,
}

impl Choice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Choice {
            title: title.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<11} {}", self.title, self.description)
    }
}

/// The questions the wizard needs to ask.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Asks the user to pick one of `choices` and returns its title.
    ///
    /// # Errors
    /// * `KcommitError::UserCancelled` if the prompt is dismissed
    fn select(&self, title: &str, choices: &[Choice]) -> Result<String>;

    /// Asks for a free-form line of text.
    ///
    /// # Errors
    /// * `KcommitError::UserCancelled` if the prompt is dismissed
    fn text(&self, title: &str, placeholder: &str) -> Result<String>;
}

/// [`Prompter`] rendering to the terminal.
pub struct InquirePrompter {
    page_size: usize,
}

impl InquirePrompter {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        InquirePrompter {
            page_size: page_size.max(1),
        }
    }
}

impl Prompter for InquirePrompter {
    fn select(&self, title: &str, choices: &[Choice]) -> Result<String> {
        let choice = Select::new(title, choices.to_vec())
            .with_page_size(self.page_size)
            .with_render_config(render_config())
            .with_help_message("↑↓ to move, enter to select, type to filter")
            .prompt()
            .map_err(map_inquire_error)?;

        Ok(choice.title)
    }

    fn text(&self, title: &str, placeholder: &str) -> Result<String> {
        Text::new(title)
            .with_placeholder(placeholder)
            .with_render_config(render_config())
            .prompt()
            .map_err(map_inquire_error)
    }
}

fn render_config() -> RenderConfig<'static> {
    RenderConfig::default()
        .with_prompt_prefix(Styled::new("?").with_fg(Color::LightMagenta))
        .with_highlighted_option_prefix(Styled::new(">").with_fg(Color::LightMagenta))
}

fn map_inquire_error(error: InquireError) -> KcommitError {
    match error {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            KcommitError::UserCancelled
        }
        other => KcommitError::Prompt(other.to_string()),
    }
}

/// Rejects empty answers and trims the others.
///
/// # Errors
/// * `KcommitError::InvalidInput` if `value` is empty or only whitespace
pub fn validate_input(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(KcommitError::InvalidInput(format!("{what} cannot be empty")));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input() {
        assert_eq!(validate_input("  add parser \n", "message").unwrap(), "add parser");
        assert!(matches!(
            validate_input("   ", "scope"),
            Err(KcommitError::InvalidInput(msg)) if msg == "scope cannot be empty"
        ));
    }

    #[test]
    fn test_choice_display() {
        let choice = Choice::new("feat", "Adds a new feature to the project.");
        assert_eq!(
            choice.to_string(),
            "feat        Adds a new feature to the project."
        );

        let long = Choice::new("localization", "Translations.");
        assert_eq!(long.to_string(), "localization Translations.");
    }

    #[test]
    fn test_cancel_maps_to_user_cancelled() {
        assert!(matches!(
            map_inquire_error(InquireError::OperationCanceled),
            KcommitError::UserCancelled
        ));
        assert!(matches!(
            map_inquire_error(InquireError::InvalidConfiguration("bad".to_string())),
            KcommitError::Prompt(_)
        ));
    }
}
