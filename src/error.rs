//! Error handling for the Boiler application.
//! Defines the error type and result alias used by every generation stage.

use std::io;
use thiserror::Error;

use crate::config::ValidationIssue;

/// Errors that can abort a generation run.
///
/// None of these are recovered from inside the engine: the first error ends
/// the run and files already written stay on disk.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur while reading or parsing a package configuration
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// The package configuration parsed but is structurally invalid
    #[error("Validation error: {}", format_issues(.0))]
    ValidationError(Vec<ValidationIssue>),

    #[error("Package '{package}' does not exist in '{boiler_dir}'.")]
    PackageNotFound { package: String, boiler_dir: String },

    #[error("Package {package} does not contain a template called {template}!")]
    TemplateNotFound { package: String, template: String },

    #[error("Template '{template}' includes itself: {chain}.")]
    TemplateCycle { template: String, chain: String },

    #[error("Template '{template}' requires undefined parameter: {param}.")]
    UndefinedRequiredParam { template: String, param: String },

    #[error("Template '{template}' defines multiple positional parameters.")]
    MultiplePositionalParams { template: String },

    #[error("Unknown optional argument: {argument}.")]
    UnknownArgument { argument: String },

    #[error("Not an optional argument: {argument} ({param_type}).")]
    NotAnOptionalArgument { argument: String, param_type: String },

    #[error("No value found for optional argument: {argument}.")]
    MissingOptionalValue { argument: String },

    #[error("Multiple positional arguments are not allowed: {argument}.")]
    MultiplePositionalArguments { argument: String },

    #[error("This template does not support positional arguments: {argument}.")]
    UnsupportedPositionalArgument { argument: String },

    #[error("Param script did not return a value for parameter '{param}': {script}")]
    ParamScriptNoValue { param: String, script: String },

    #[error("Custom prompt did not define parameter '{param}': {script}")]
    CustomPromptNoValue { param: String, script: String },

    /// A hook or parameter script failed at runtime
    #[error("Script {script} failed with the following error: {message}")]
    ScriptExecutionError { script: String, message: String },

    #[error("Unknown replace variation: {variation}.")]
    UnknownReplaceVariation { variation: String },

    #[error("Invalid replace target '{pattern}': {source}")]
    InvalidReplacePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Max number of retries ({max_retries}) exceeded.")]
    PromptRetriesExceeded { max_retries: usize },

    /// The prompt backend itself failed (closed terminal, broken pipe, ...)
    #[error("Prompt error: {0}.")]
    PromptError(String),
}

/// Convenience type alias for Results with the Boiler error type.
pub type Result<T> = std::result::Result<T, Error>;

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues.iter().map(|issue| format!("\n{issue}")).collect()
}

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
