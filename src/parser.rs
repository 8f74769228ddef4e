//! Template argument parsing and parameter resolution.
//!
//! Arguments given after the template name are matched against the
//! template's parameter table. Whatever is still missing afterwards goes
//! through the fallback chain: default value, virtual parameter script,
//! custom prompt script, interactive prompt.

use std::path::Path;

use log::debug;

use crate::config::{PackageConfig, ParamDefinition, ParamTable, ParamType};
use crate::constants::PROMPT_HOOK_SUFFIX;
use crate::error::{Error, Result};
use crate::hooks::{HookContext, HookRunner};
use crate::layout::PackageLayout;
use crate::prompt::{param_prompt_message, prompt_text, Prompter, Retries};
use crate::substitution::ParamMap;

/// Outcome of [`parse_arguments`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArguments {
    /// Values taken from the command line
    pub resolved: ParamMap,
    /// Parameters still lacking a value, positional first, then in declaration order
    pub undefined: Vec<ParamDefinition>,
}

/// Parses template arguments against `table`.
///
/// `--name` selects a flag (set to `"true"`) or an optional parameter (takes
/// the next token as its value); any other token is the positional value.
///
/// # Errors
/// * `UnknownArgument` for `--name` not in the table
/// * `NotAnOptionalArgument` for `--name` naming a positional or virtual parameter
/// * `MissingOptionalValue` when an optional parameter is the last token
/// * `MultiplePositionalArguments` on the second bare token
/// * `UnsupportedPositionalArgument` when the template has no positional parameter
pub fn parse_arguments<S: AsRef<str>>(table: &ParamTable, args: &[S]) -> Result<ParsedArguments> {
    let mut resolved = ParamMap::new();
    let mut positional_set = false;

    let mut tokens = args.iter().map(AsRef::as_ref);
    while let Some(arg) = tokens.next() {
        if let Some(name) = arg.strip_prefix("--") {
            let param = table
                .params
                .get(name)
                .ok_or_else(|| Error::UnknownArgument { argument: arg.to_string() })?;
            match param.param_type {
                ParamType::Flag => {
                    resolved.insert(param.name.clone(), "true".to_string());
                }
                ParamType::Optional => {
                    let value = tokens
                        .next()
                        .ok_or_else(|| Error::MissingOptionalValue { argument: arg.to_string() })?;
                    resolved.insert(param.name.clone(), value.to_string());
                }
                other => {
                    return Err(Error::NotAnOptionalArgument {
                        argument: arg.to_string(),
                        param_type: other.to_string(),
                    });
                }
            }
        } else {
            if positional_set {
                return Err(Error::MultiplePositionalArguments { argument: arg.to_string() });
            }
            let param = table
                .positional
                .as_ref()
                .ok_or_else(|| Error::UnsupportedPositionalArgument { argument: arg.to_string() })?;
            resolved.insert(param.name.clone(), arg.to_string());
            positional_set = true;
        }
    }

    let mut undefined = Vec::new();
    if let Some(positional) = &table.positional {
        if !positional_set {
            undefined.push(positional.clone());
        }
    }
    for param in table.params.values() {
        if matches!(param.param_type, ParamType::Flag | ParamType::Positional) {
            continue;
        }
        if !resolved.contains_key(&param.name) {
            undefined.push(param.clone());
        }
    }

    Ok(ParsedArguments { resolved, undefined })
}

/// Resolves the parameter map of one generation run.
pub struct ParamResolver<'a> {
    hooks: &'a dyn HookRunner,
    prompt: &'a dyn Prompter,
    retries: Retries,
}

impl<'a> ParamResolver<'a> {
    pub fn new(hooks: &'a dyn HookRunner, prompt: &'a dyn Prompter) -> Self {
        Self { hooks, prompt, retries: Retries::Indefinite }
    }

    /// Overrides the retry policy of the default interactive prompt.
    pub fn with_retries(mut self, retries: Retries) -> Self {
        self.retries = retries;
        self
    }

    /// Parses `args` for `template_name` and resolves every missing parameter.
    pub fn resolve_params<S: AsRef<str>>(
        &self,
        project_root: &Path,
        layout: &PackageLayout,
        config: &PackageConfig,
        template_name: &str,
        args: &[S],
    ) -> Result<ParamMap> {
        let template = config.require_template(layout.name(), template_name)?;
        let table = config.template_params(template)?;
        let parsed = parse_arguments(&table, args)?;
        debug!("Parameters from arguments: {:?}", parsed.resolved);

        let mut params = parsed.resolved;
        self.resolve_undefined_params(project_root, layout, &parsed.undefined, &mut params)?;
        Ok(params)
    }

    /// Resolves `undefined` in order, inserting each value into `params`.
    ///
    /// Values resolved earlier are visible to the scripts of later parameters.
    pub fn resolve_undefined_params(
        &self,
        project_root: &Path,
        layout: &PackageLayout,
        undefined: &[ParamDefinition],
        params: &mut ParamMap,
    ) -> Result<()> {
        for param in undefined {
            let value = self.resolve_param(project_root, layout, param, params)?;
            params.insert(param.name.clone(), value);
        }
        Ok(())
    }

    fn resolve_param(
        &self,
        project_root: &Path,
        layout: &PackageLayout,
        param: &ParamDefinition,
        params: &mut ParamMap,
    ) -> Result<String> {
        if let Some(default_value) = &param.default_value {
            debug!("Using default value for '{}'", param.name);
            return Ok(default_value.clone());
        }

        if param.param_type == ParamType::Virtual {
            let script = param.script.as_deref().unwrap_or_default();
            debug!("Running script of virtual parameter '{}'", param.name);
            return self.hooks.run_param_script(project_root, script, params)?.ok_or_else(|| {
                Error::ParamScriptNoValue { param: param.name.clone(), script: script.to_string() }
            });
        }

        let prompt_script = layout.script_path(&format!("{}{PROMPT_HOOK_SUFFIX}", param.name));
        let mut context =
            HookContext { project_root, out_dir: Path::new(""), params: &mut *params };
        if self.hooks.run_hook(&prompt_script, &mut context)? {
            return params.get(&param.name).filter(|value| !value.is_empty()).cloned().ok_or_else(
                || Error::CustomPromptNoValue {
                    param: param.name.clone(),
                    script: prompt_script
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                },
            );
        }

        prompt_text(self.prompt, &param_prompt_message(param), None, self.retries)
    }
}
