//! User input and interaction handling.
//! Every question the engine or a hook script asks goes through a [`Prompter`].

use crate::config::{ParamDefinition, ParamType};
use crate::error::{Error, Result};
use dialoguer::{Confirm, Input, Select};
use log::warn;

/// How often an empty answer is asked again before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retries {
    /// Keep asking until a value is supplied
    #[default]
    Indefinite,
    /// Ask at most `n + 1` times
    Limited(usize),
}

/// Trait for interactive input backends.
pub trait Prompter: Send + Sync {
    /// Asks for a line of text. An empty answer selects `default` when one is given.
    fn text(&self, message: &str, default: Option<&str>) -> Result<String>;

    /// Asks a yes/no question.
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Asks for one of `choices`; `default` indexes the preselected choice.
    ///
    /// The default implementation lists the choices numbered from 1 and
    /// accepts either a number or the literal choice, asking again until the
    /// answer names an existing choice.
    fn select(&self, message: &str, choices: &[String], default: usize) -> Result<String> {
        if choices.is_empty() {
            return Err(Error::PromptError(format!("no choices given for '{message}'")));
        }

        let mut question = format!("{message}:\n");
        for (i, choice) in choices.iter().enumerate() {
            question.push_str(&format!("\n{}) {choice}", i + 1));
        }
        let default_choice = choices.get(default).map(String::as_str);

        loop {
            let answer = self.text(&question, default_choice)?;
            if answer.trim().is_empty() {
                if let Some(choice) = default_choice {
                    return Ok(choice.to_string());
                }
            }
            if let Some(choice) = match_choice(&answer, choices) {
                return Ok(choice.to_string());
            }
            warn!("That choice does not exist. Please try again.");
        }
    }
}

/// Finds the choice named by `answer`: a 1-based number or the choice itself.
pub fn match_choice<'a>(answer: &str, choices: &'a [String]) -> Option<&'a str> {
    let answer = answer.trim();
    match answer.parse::<usize>() {
        Ok(number) => number.checked_sub(1).and_then(|i| choices.get(i)).map(String::as_str),
        Err(_) => choices.iter().find(|choice| *choice == answer).map(String::as_str),
    }
}

/// Terminal prompter backed by `dialoguer`.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&self, message: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(message).allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(|e| Error::PromptError(e.to_string()))
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }

    fn select(&self, message: &str, choices: &[String], default: usize) -> Result<String> {
        if choices.is_empty() {
            return Err(Error::PromptError(format!("no choices given for '{message}'")));
        }
        let selection = Select::new()
            .with_prompt(message)
            .default(default.min(choices.len() - 1))
            .items(choices)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))?;
        Ok(choices[selection].clone())
    }
}

/// Asks for a non-empty text value, re-asking on empty answers according to `retries`.
///
/// Errors from the prompter itself are returned immediately; only empty
/// answers count as retries.
///
/// # Errors
/// * `Error::PromptRetriesExceeded` when a limited retry budget runs out
pub fn prompt_text(
    prompter: &dyn Prompter,
    message: &str,
    default: Option<&str>,
    retries: Retries,
) -> Result<String> {
    let mut retried = 0;
    loop {
        let answer = prompter.text(message, default)?;
        if !answer.trim().is_empty() {
            return Ok(answer);
        }
        if let Retries::Limited(max_retries) = retries {
            if retried >= max_retries {
                return Err(Error::PromptRetriesExceeded { max_retries });
            }
        }
        retried += 1;
        warn!("A value is required. Please try again.");
    }
}

/// Builds the default prompt message for an unresolved parameter.
///
/// The message names the parameter (display name first), adds its
/// description and ends with a caption showing the known default, or
/// `(optional)` for optional and flag parameters.
pub fn param_prompt_message(param: &ParamDefinition) -> String {
    let label = param.display_name.as_deref().unwrap_or(&param.name);
    let mut message = format!("Enter a value for '{label}'");
    if let Some(description) = &param.description {
        message.push_str(&format!(" - {description}"));
    }
    match (&param.default_value, param.param_type) {
        (Some(default), _) => message.push_str(&format!(" [default: {default}]")),
        (None, ParamType::Optional | ParamType::Flag) => message.push_str(" (optional)"),
        _ => {}
    }
    message
}
