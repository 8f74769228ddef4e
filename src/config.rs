//! Package configuration handling.
//! Loads `boiler.json` / `boiler.yml` / `boiler.yaml` from a package directory,
//! resolves per-template parameter tables and validates the configuration shape.

use crate::constants::CONFIG_FILES;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// How a parameter receives its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Bare command-line token; at most one per template
    Positional,
    /// `--name` switch, resolved to `"true"` when present
    Flag,
    /// `--name value` pair
    Optional,
    /// Computed by a script
    Virtual,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::Positional => "positional",
            ParamType::Flag => "flag",
            ParamType::Optional => "optional",
            ParamType::Virtual => "virtual",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDefinition {
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Script computing the value of a virtual parameter
    pub script: Option<String>,
    pub default_value: Option<String>,
}

impl ParamDefinition {
    pub fn new<S: Into<String>>(name: S, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            param_type,
            script: None,
            default_value: None,
        }
    }
}

/// A `require` entry: either the name of a package parameter or an inline definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequireEntry {
    Name(String),
    Inline(ParamDefinition),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeRef {
    /// Template node name or template file base name
    pub name: String,
    pub out_dir: Option<String>,
}

/// An `include` entry as written in the configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IncludeEntry {
    Name(String),
    Ref(IncludeRef),
}

impl IncludeEntry {
    /// Normalizes bare names to an [`IncludeRef`] without an output directory.
    pub fn to_ref(&self) -> IncludeRef {
        match self {
            IncludeEntry::Name(name) => IncludeRef { name: name.clone(), out_dir: None },
            IncludeEntry::Ref(include) => include.clone(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            IncludeEntry::Name(name) => name,
            IncludeEntry::Ref(include) => &include.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputReplaceRule {
    pub target: String,
    pub with: String,
    #[serde(default)]
    pub variations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateNode {
    pub name: String,
    #[serde(default)]
    pub require: Vec<RequireEntry>,
    pub out_dir: Option<String>,
    #[serde(default)]
    pub include: Vec<IncludeEntry>,
    /// Rules folded into the hardcoded parameters of this node's subtree
    #[serde(default)]
    pub replace: Vec<OutputReplaceRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileOutputConfig {
    #[serde(default)]
    pub replace: Vec<OutputReplaceRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub file: FileOutputConfig,
}

/// Parsed package configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PackageConfig {
    #[serde(default)]
    pub params: Vec<ParamDefinition>,
    #[serde(default)]
    pub templates: Vec<TemplateNode>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Parameters required by one template, keyed by name in `require` order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamTable {
    pub params: IndexMap<String, ParamDefinition>,
    pub positional: Option<ParamDefinition>,
}

/// A single problem found by [`PackageConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// JSON-path-like location, e.g. `$.templates.0.require.1`
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self { path: path.into(), message: message.into() }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl PackageConfig {
    pub fn find_param(&self, name: &str) -> Option<&ParamDefinition> {
        self.params.iter().find(|param| param.name == name)
    }

    pub fn find_template(&self, name: &str) -> Option<&TemplateNode> {
        self.templates.iter().find(|template| template.name == name)
    }

    /// Like [`find_template`](Self::find_template) but fails with `TemplateNotFound`.
    pub fn require_template(&self, package: &str, name: &str) -> Result<&TemplateNode> {
        self.find_template(name).ok_or_else(|| Error::TemplateNotFound {
            package: package.to_string(),
            template: name.to_string(),
        })
    }

    /// Rules rewriting every generated file path.
    pub fn output_replace_rules(&self) -> &[OutputReplaceRule] {
        &self.output.file.replace
    }

    /// Builds the parameter table of `template`.
    ///
    /// # Errors
    /// * `UndefinedRequiredParam` if a `require` name is not a package parameter
    /// * `MultiplePositionalParams` if more than one positional parameter is required
    pub fn template_params(&self, template: &TemplateNode) -> Result<ParamTable> {
        let mut table = ParamTable::default();

        for entry in &template.require {
            let param = match entry {
                RequireEntry::Name(name) => {
                    self.find_param(name).cloned().ok_or_else(|| {
                        Error::UndefinedRequiredParam {
                            template: template.name.clone(),
                            param: name.clone(),
                        }
                    })?
                }
                RequireEntry::Inline(param) => param.clone(),
            };

            if param.param_type == ParamType::Positional {
                if table.positional.is_some() {
                    return Err(Error::MultiplePositionalParams {
                        template: template.name.clone(),
                    });
                }
                table.positional = Some(param.clone());
            }
            table.params.insert(param.name.clone(), param);
        }

        Ok(table)
    }

    /// Checks the configuration for structural problems serde cannot express.
    ///
    /// Returns every issue found; an empty list means the configuration is usable.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let mut param_names = HashSet::new();
        for (i, param) in self.params.iter().enumerate() {
            let path = format!("$.params.{i}");
            validate_param(&path, param, &mut issues);
            if !param_names.insert(param.name.as_str()) {
                issues.push(ValidationIssue::new(
                    path,
                    format!("duplicate parameter name '{}'", param.name),
                ));
            }
        }

        let mut template_names = HashSet::new();
        for (i, template) in self.templates.iter().enumerate() {
            let path = format!("$.templates.{i}");
            if template.name.is_empty() {
                issues.push(ValidationIssue::new(&path, "name should not be empty"));
            } else if !template_names.insert(template.name.as_str()) {
                issues.push(ValidationIssue::new(
                    &path,
                    format!("duplicate template name '{}'", template.name),
                ));
            }

            let mut positional = 0;
            for (j, entry) in template.require.iter().enumerate() {
                let entry_path = format!("{path}.require.{j}");
                let param_type = match entry {
                    RequireEntry::Name(name) if name.is_empty() => {
                        issues.push(ValidationIssue::new(
                            entry_path,
                            "should not be an empty string",
                        ));
                        continue;
                    }
                    RequireEntry::Name(name) => match self.find_param(name) {
                        Some(param) => param.param_type,
                        None => {
                            issues.push(ValidationIssue::new(
                                entry_path,
                                format!("references undefined parameter '{name}'"),
                            ));
                            continue;
                        }
                    },
                    RequireEntry::Inline(param) => {
                        validate_param(&entry_path, param, &mut issues);
                        param.param_type
                    }
                };
                if param_type == ParamType::Positional {
                    positional += 1;
                }
            }
            if positional > 1 {
                issues.push(ValidationIssue::new(
                    &path,
                    "defines multiple positional parameters",
                ));
            }

            for (j, include) in template.include.iter().enumerate() {
                if include.name().is_empty() {
                    issues.push(ValidationIssue::new(
                        format!("{path}.include.{j}"),
                        "name should not be empty",
                    ));
                }
            }

            for (j, rule) in template.replace.iter().enumerate() {
                validate_rule(&format!("{path}.replace.{j}"), rule, false, &mut issues);
            }
        }

        for (i, rule) in self.output.file.replace.iter().enumerate() {
            validate_rule(&format!("$.output.file.replace.{i}"), rule, true, &mut issues);
        }

        issues
    }
}

fn validate_param(path: &str, param: &ParamDefinition, issues: &mut Vec<ValidationIssue>) {
    if param.name.is_empty() {
        issues.push(ValidationIssue::new(path, "name should not be empty"));
    }
    let has_script = param.script.as_deref().is_some_and(|script| !script.trim().is_empty());
    if param.param_type == ParamType::Virtual && !has_script {
        issues.push(ValidationIssue::new(path, "must specify script when param is virtual"));
    }
}

fn validate_rule(
    path: &str,
    rule: &OutputReplaceRule,
    is_pattern: bool,
    issues: &mut Vec<ValidationIssue>,
) {
    if rule.target.is_empty() {
        issues.push(ValidationIssue::new(path, "target should not be empty"));
    } else if is_pattern {
        if let Err(e) = Regex::new(&rule.target) {
            issues.push(ValidationIssue::new(path, format!("invalid target pattern: {e}")));
        }
    }
}

/// Parses configuration content, trying JSON first and YAML second, then validates it.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML
/// * `Error::ValidationError` if the parsed configuration has structural issues
pub fn parse_config(content: &str) -> Result<PackageConfig> {
    let config: PackageConfig = match serde_json::from_str(content) {
        Ok(config) => config,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}")))?,
    };

    let issues = config.validate();
    if !issues.is_empty() {
        return Err(Error::ValidationError(issues));
    }
    Ok(config)
}

/// Loads the configuration of the package stored in `package_dir`.
///
/// The first existing file of [`CONFIG_FILES`] wins.
pub fn load_config<P: AsRef<Path>>(package_dir: P) -> Result<PackageConfig> {
    let package_dir = package_dir.as_ref();
    for file in CONFIG_FILES {
        let config_path = package_dir.join(file);
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)?;
            return parse_config(&content);
        }
    }

    Err(Error::ConfigError(format!(
        "No configuration file found in '{}' (tried: {})",
        package_dir.display(),
        CONFIG_FILES.join(", ")
    )))
}
