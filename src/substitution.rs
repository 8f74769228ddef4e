//! Variable substitution for template content and output paths.
//! Pure string functions; nothing here touches the filesystem.

use crate::config::OutputReplaceRule;
use crate::error::{Error, Result};
use cruet::Inflector;
use indexmap::IndexMap;
use regex::Regex;
use std::str::FromStr;

/// Parameter values keyed by name, in insertion order.
pub type ParamMap = IndexMap<String, String>;

/// Replaces every `{{key}}` whose key is present in `params` with its value.
///
/// The text is scanned once from left to right: inserted values are never
/// scanned again and placeholders naming unknown keys are kept verbatim.
///
/// # Example
/// ```
/// use boiler::substitution::{substitute, ParamMap};
///
/// let mut params = ParamMap::new();
/// params.insert("a".to_string(), "apple".to_string());
/// assert_eq!(substitute("I just ate an {{a}}.", &params), "I just ate an apple.");
/// ```
pub fn substitute(text: &str, params: &ParamMap) -> String {
    if params.is_empty() {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let candidate = &rest[start + 2..];
        let hit = candidate
            .find("}}")
            .and_then(|end| params.get(&candidate[..end]).map(|value| (end, value)));
        match hit {
            Some((end, value)) => {
                output.push_str(value);
                rest = &candidate[end + 2..];
            }
            None => {
                // Not a known placeholder; emit one brace and rescan from the next one.
                output.push('{');
                rest = &rest[start + 1..];
            }
        }
    }
    output.push_str(rest);
    output
}

/// A named transform producing extra substitution tokens from a replace rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variation {
    PascalCase,
    CamelCase,
    Plural,
}

impl Variation {
    pub fn apply(self, value: &str) -> String {
        match self {
            Variation::PascalCase => value.to_pascal_case(),
            Variation::CamelCase => value.to_camel_case(),
            Variation::Plural => value.to_plural(),
        }
    }
}

impl FromStr for Variation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pascalcase" => Ok(Variation::PascalCase),
            "camelcase" => Ok(Variation::CamelCase),
            "plural" => Ok(Variation::Plural),
            _ => Err(Error::UnknownReplaceVariation { variation: s.to_string() }),
        }
    }
}

/// Computes the substitution entries contributed by one replace rule.
///
/// The first entry is the substituted `(target, with)` pair, followed by one
/// pair per variation in declaration order.
pub fn derive_variations(
    rule: &OutputReplaceRule,
    params: &ParamMap,
) -> Result<Vec<(String, String)>> {
    let key = substitute(&rule.target, params);
    let value = substitute(&rule.with, params);

    let mut entries = Vec::with_capacity(rule.variations.len() + 1);
    for name in &rule.variations {
        let variation: Variation = name.parse()?;
        entries.push((variation.apply(&key), variation.apply(&value)));
    }
    entries.insert(0, (key, value));
    Ok(entries)
}

/// Folds `rules` into a new hardcoded parameter map that starts from `inherited`.
pub fn fold_replace_rules(
    inherited: Option<&ParamMap>,
    rules: &[OutputReplaceRule],
    params: &ParamMap,
) -> Result<ParamMap> {
    let mut hardcoded = inherited.cloned().unwrap_or_default();
    for rule in rules {
        for (key, value) in derive_variations(rule, params)? {
            hardcoded.insert(key, value);
        }
    }
    Ok(hardcoded)
}

/// Rewrites a generated file path with the package's output replace rules.
///
/// Each rule's target is a regular expression replaced globally; its `with`
/// value is substituted against `params` first and may reference capture
/// groups (`$1`).
pub fn apply_output_replacements(
    path: &str,
    rules: &[OutputReplaceRule],
    params: &ParamMap,
) -> Result<String> {
    let mut output = path.to_string();
    for rule in rules {
        let pattern = Regex::new(&rule.target).map_err(|source| Error::InvalidReplacePattern {
            pattern: rule.target.clone(),
            source,
        })?;
        let replacement = substitute(&rule.with, params);
        output = pattern.replace_all(&output, replacement.as_str()).into_owned();
    }
    Ok(output)
}
