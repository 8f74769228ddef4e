mod common;

use boiler::config::{ParamDefinition, ParamTable, ParamType};
use boiler::error::Error;
use boiler::parser::{parse_arguments, ParamResolver};
use boiler::prompt::Retries;
use common::{params, FakeHooks, ScriptedPrompter, TestPackage};
use serde_json::json;
use tempfile::TempDir;

fn table(defs: &[(&str, ParamType)]) -> ParamTable {
    let mut table = ParamTable::default();
    for (name, param_type) in defs {
        let param = ParamDefinition::new(*name, *param_type);
        if *param_type == ParamType::Positional {
            table.positional = Some(param.clone());
        }
        table.params.insert(name.to_string(), param);
    }
    table
}

fn fruit_table() -> ParamTable {
    table(&[
        ("a", ParamType::Positional),
        ("b", ParamType::Optional),
        ("c", ParamType::Optional),
        ("d", ParamType::Optional),
        ("e", ParamType::Optional),
    ])
}

fn undefined_names(undefined: &[ParamDefinition]) -> Vec<&str> {
    undefined.iter().map(|param| param.name.as_str()).collect()
}

fn fruit_package(d_script: bool) -> TestPackage {
    let d = if d_script {
        json!({ "name": "d", "type": "virtual", "script": "{{ params.a | plural }}" })
    } else {
        json!({ "name": "d", "type": "optional" })
    };
    TestPackage::new(
        "fruit",
        json!({
            "params": [
                { "name": "a", "type": "positional" },
                { "name": "b", "type": "optional" },
                { "name": "c", "type": "optional" },
                d,
                { "name": "e", "type": "optional" }
            ],
            "templates": [{ "name": "my-template", "require": ["a", "b", "c", "d", "e"] }]
        }),
    )
}

#[test]
fn test_parse_positional_and_optionals() {
    let parsed = parse_arguments(&fruit_table(), &["--c", "corn", "apple", "--d", "dates"]).unwrap();

    assert_eq!(parsed.resolved, params(&[("c", "corn"), ("a", "apple"), ("d", "dates")]));
    assert_eq!(undefined_names(&parsed.undefined), vec!["b", "e"]);
}

#[test]
fn test_parse_order_does_not_matter() {
    let first = parse_arguments(&fruit_table(), &["--b", "x", "--c", "y", "apple"]).unwrap();
    let second = parse_arguments(&fruit_table(), &["apple", "--c", "y", "--b", "x"]).unwrap();

    assert_eq!(first.resolved, second.resolved);
}

#[test]
fn test_parse_undefined_positional_first() {
    let parsed = parse_arguments(&fruit_table(), &["--c", "corn"]).unwrap();

    assert_eq!(undefined_names(&parsed.undefined), vec!["a", "b", "d", "e"]);
}

#[test]
fn test_parse_flags() {
    let table = table(&[("verbose", ParamType::Flag), ("name", ParamType::Optional)]);

    let parsed = parse_arguments(&table, &["--verbose", "--name", "Rex"]).unwrap();
    assert_eq!(parsed.resolved, params(&[("verbose", "true"), ("name", "Rex")]));

    // Unset flags are never prompted for.
    let parsed = parse_arguments(&table, &["--name", "Rex"]).unwrap();
    assert!(!parsed.resolved.contains_key("verbose"));
    assert!(parsed.undefined.is_empty());
}

#[test]
fn test_parse_no_arguments() {
    let parsed = parse_arguments::<&str>(&fruit_table(), &[]).unwrap();

    assert!(parsed.resolved.is_empty());
    assert_eq!(parsed.undefined.len(), 5);
}

#[test]
fn test_parse_multiple_positional_arguments() {
    let err = parse_arguments(&fruit_table(), &["apple", "butter"]).unwrap_err();

    assert!(matches!(err, Error::MultiplePositionalArguments { ref argument } if argument == "butter"));
    assert_eq!(err.to_string(), "Multiple positional arguments are not allowed: butter.");
}

#[test]
fn test_parse_unsupported_positional_argument() {
    let table = table(&[("a", ParamType::Optional), ("b", ParamType::Optional)]);
    let err = parse_arguments(&table, &["--a", "apple", "--b", "butter", "corn"]).unwrap_err();

    assert_eq!(err.to_string(), "This template does not support positional arguments: corn.");
}

#[test]
fn test_parse_unknown_argument() {
    let err = parse_arguments(&fruit_table(), &["--p", "pear"]).unwrap_err();

    assert_eq!(err.to_string(), "Unknown optional argument: --p.");
}

#[test]
fn test_parse_not_an_optional_argument() {
    let err = parse_arguments(&fruit_table(), &["--a", "apple"]).unwrap_err();
    assert_eq!(err.to_string(), "Not an optional argument: --a (positional).");

    let table = table(&[("v", ParamType::Virtual)]);
    let err = parse_arguments(&table, &["--v"]).unwrap_err();
    assert!(matches!(err, Error::NotAnOptionalArgument { ref param_type, .. } if param_type == "virtual"));
}

#[test]
fn test_parse_missing_optional_value() {
    let err = parse_arguments(&fruit_table(), &["apple", "--b"]).unwrap_err();

    assert!(matches!(err, Error::MissingOptionalValue { ref argument } if argument == "--b"));
}

#[test]
fn test_resolve_with_custom_prompt_and_default_prompt() {
    let package = fruit_package(false);
    let project = TempDir::new().unwrap();
    let hooks = FakeHooks::new().with_prompt_script("b-prompt", Some(("b", "butter")));
    let prompt = ScriptedPrompter::new(&["edamame"]);

    let resolved = ParamResolver::new(&hooks, &prompt)
        .resolve_params(
            project.path(),
            &package.layout,
            &package.config(),
            "my-template",
            &["--c", "corn", "apple", "--d", "dates"],
        )
        .unwrap();

    assert_eq!(
        resolved,
        params(&[("a", "apple"), ("b", "butter"), ("c", "corn"), ("d", "dates"), ("e", "edamame")])
    );
    // The custom prompt for `b` saw everything resolved before it.
    assert_eq!(
        hooks.hook_params.borrow()[0],
        params(&[("c", "corn"), ("a", "apple"), ("d", "dates")])
    );
    assert_eq!(hooks.scripts(), vec!["b-prompt", "e-prompt"]);
    assert_eq!(prompt.asked(), vec!["Enter a value for 'e' (optional)".to_string()]);
}

#[test]
fn test_resolve_virtual_param_script() {
    let package = fruit_package(true);
    let project = TempDir::new().unwrap();
    let hooks = FakeHooks::new().with_param_script("{{ params.a | plural }}", "apples");
    let prompt = ScriptedPrompter::new(&["apple", "edamame"]);

    let resolved = ParamResolver::new(&hooks, &prompt)
        .resolve_params(
            project.path(),
            &package.layout,
            &package.config(),
            "my-template",
            &["--c", "corn", "--b", "butter"],
        )
        .unwrap();

    assert_eq!(
        resolved,
        params(&[("a", "apple"), ("b", "butter"), ("c", "corn"), ("d", "apples"), ("e", "edamame")])
    );
    assert_eq!(
        hooks.script_params.borrow()[0],
        params(&[("a", "apple"), ("b", "butter"), ("c", "corn")])
    );
    assert_eq!(prompt.asked().len(), 2);
}

#[test]
fn test_resolve_param_script_without_value() {
    let package = fruit_package(true);
    let project = TempDir::new().unwrap();
    let hooks = FakeHooks::new();
    let prompt = ScriptedPrompter::new(&[]);

    let err = ParamResolver::new(&hooks, &prompt)
        .resolve_params(
            project.path(),
            &package.layout,
            &package.config(),
            "my-template",
            &["apple", "--b", "butter", "--c", "corn", "--e", "eggs"],
        )
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Param script did not return a value for parameter 'd': {{ params.a | plural }}"
    );
}

#[test]
fn test_resolve_custom_prompt_without_value() {
    let package = fruit_package(false);
    let project = TempDir::new().unwrap();
    let hooks = FakeHooks::new().with_prompt_script("b-prompt", None);
    let prompt = ScriptedPrompter::new(&[]);

    let err = ParamResolver::new(&hooks, &prompt)
        .resolve_params(project.path(), &package.layout, &package.config(), "my-template", &["apple"])
        .unwrap_err();

    assert!(matches!(
        err,
        Error::CustomPromptNoValue { ref param, ref script } if param == "b" && script == "b-prompt.j2"
    ));
}

#[test]
fn test_resolve_default_value_skips_prompt() {
    let package = TestPackage::new(
        "defaults",
        json!({
            "params": [{ "name": "author", "type": "optional", "defaultValue": "boiler" }],
            "templates": [{ "name": "t", "require": ["author"] }]
        }),
    );
    let project = TempDir::new().unwrap();
    let hooks = FakeHooks::new();
    let prompt = ScriptedPrompter::new(&[]);

    let resolved = ParamResolver::new(&hooks, &prompt)
        .resolve_params::<&str>(project.path(), &package.layout, &package.config(), "t", &[])
        .unwrap();

    assert_eq!(resolved, params(&[("author", "boiler")]));
    assert!(hooks.calls.borrow().is_empty());
}

#[test]
fn test_resolve_prompt_retries_exceeded() {
    let package = fruit_package(false);
    let project = TempDir::new().unwrap();
    let hooks = FakeHooks::new();
    let prompt = ScriptedPrompter::new(&["", ""]);

    let err = ParamResolver::new(&hooks, &prompt)
        .with_retries(Retries::Limited(1))
        .resolve_params::<&str>(project.path(), &package.layout, &package.config(), "my-template", &[])
        .unwrap_err();

    assert!(matches!(err, Error::PromptRetriesExceeded { max_retries: 1 }));
    assert_eq!(prompt.asked().len(), 2);
}

#[test]
fn test_resolve_unknown_template() {
    let package = fruit_package(false);
    let project = TempDir::new().unwrap();
    let hooks = FakeHooks::new();
    let prompt = ScriptedPrompter::new(&[]);

    let err = ParamResolver::new(&hooks, &prompt)
        .resolve_params::<&str>(project.path(), &package.layout, &package.config(), "other", &[])
        .unwrap_err();

    assert_eq!(err.to_string(), "Package fruit does not contain a template called other!");
}
