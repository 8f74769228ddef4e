//! Embedded interpreter for hook and parameter scripts.
//!
//! Scripts are MiniJinja templates. Every run gets a fresh
//! [`Environment`](minijinja::Environment) that only knows the objects
//! registered here:
//!
//! * variables: `params` (snapshot taken when the script starts), `out_dir`, `cwd`
//! * parameters: `param(name)`, `set_param(name, value)`
//! * string filters: `pascalcase`, `camelcase`, `snakecase`, `kebabcase`,
//!   `plural`, `singular`, and the MiniJinja builtins
//! * files: `path_exists`, `read_file`, `write_file`, `make_dir`, `join_path`;
//!   relative paths are resolved against the project root
//! * prompts: `prompt(message, default)`, `confirm(message, default)`,
//!   `select(message, choices, default)`
//! * `run_command(program, args...)`, only with [`ScriptOptions::allow_commands`]
//!
//! ```text
//! {{ set_param("package_path", param("package") | replace(".", "/")) }}
//! {{ set_param("entity", param("name") | pascalcase) }}
//! ```

use crate::prompt::Prompter;
use crate::substitution::ParamMap;
use cruet::Inflector;
use log::debug;
use minijinja::value::Rest;
use minijinja::{context, Environment, Error, ErrorKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Switches for capabilities that are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Registers `run_command`, letting scripts start processes in the project root
    pub allow_commands: bool,
}

/// Runs scripts against a parameter map.
pub struct ScriptEngine {
    prompter: Arc<dyn Prompter>,
    options: ScriptOptions,
}

impl ScriptEngine {
    pub fn new(prompter: Arc<dyn Prompter>, options: ScriptOptions) -> Self {
        Self { prompter, options }
    }

    /// Renders `source` and returns its output.
    ///
    /// Changes made through `set_param` are written back to `params` even when
    /// the script fails part-way.
    pub fn run(
        &self,
        source: &str,
        project_root: &Path,
        out_dir: &Path,
        params: &mut ParamMap,
    ) -> Result<String, Error> {
        let live = Arc::new(Mutex::new(params.clone()));
        let env = self.environment(project_root, &live);

        let snapshot = params.clone();
        let rendered = env.render_str(
            source,
            context! {
                params => snapshot,
                out_dir => out_dir.display().to_string(),
                cwd => project_root.display().to_string(),
            },
        );

        *params = lock(&live).clone();
        rendered
    }

    fn environment(&self, project_root: &Path, live: &Arc<Mutex<ParamMap>>) -> Environment<'static> {
        let mut env = Environment::new();

        env.add_filter("pascalcase", |value: String| value.to_pascal_case());
        env.add_filter("camelcase", |value: String| value.to_camel_case());
        env.add_filter("snakecase", |value: String| value.to_snake_case());
        env.add_filter("kebabcase", |value: String| value.to_kebab_case());
        env.add_filter("plural", |value: String| value.to_plural());
        env.add_filter("singular", |value: String| value.to_singular());

        let params = Arc::clone(live);
        env.add_function("param", move |name: String| -> String {
            lock(&params).get(&name).cloned().unwrap_or_default()
        });
        let params = Arc::clone(live);
        env.add_function("set_param", move |name: String, value: String| -> String {
            debug!("Script set parameter '{name}'");
            lock(&params).insert(name, value);
            String::new()
        });

        let root = project_root.to_path_buf();
        env.add_function("path_exists", move |path: String| -> bool {
            resolve(&root, &path).exists()
        });
        let root = project_root.to_path_buf();
        env.add_function("read_file", move |path: String| -> Result<String, Error> {
            fs::read_to_string(resolve(&root, &path))
                .map_err(|e| script_error(format!("cannot read '{path}': {e}")))
        });
        let root = project_root.to_path_buf();
        env.add_function(
            "write_file",
            move |path: String, content: String| -> Result<String, Error> {
                let target = resolve(&root, &path);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)
                        .map_err(|e| script_error(format!("cannot create '{path}': {e}")))?;
                }
                fs::write(&target, content)
                    .map_err(|e| script_error(format!("cannot write '{path}': {e}")))?;
                Ok(String::new())
            },
        );
        let root = project_root.to_path_buf();
        env.add_function("make_dir", move |path: String| -> Result<String, Error> {
            fs::create_dir_all(resolve(&root, &path))
                .map_err(|e| script_error(format!("cannot create '{path}': {e}")))?;
            Ok(String::new())
        });
        env.add_function("join_path", |parts: Rest<String>| -> String {
            parts.iter().collect::<PathBuf>().display().to_string()
        });

        let prompter = Arc::clone(&self.prompter);
        env.add_function(
            "prompt",
            move |message: String, default: Option<String>| -> Result<String, Error> {
                prompter.text(&message, default.as_deref()).map_err(|e| script_error(e.to_string()))
            },
        );
        let prompter = Arc::clone(&self.prompter);
        env.add_function(
            "confirm",
            move |message: String, default: Option<bool>| -> Result<bool, Error> {
                prompter
                    .confirm(&message, default.unwrap_or(false))
                    .map_err(|e| script_error(e.to_string()))
            },
        );
        let prompter = Arc::clone(&self.prompter);
        env.add_function(
            "select",
            move |message: String,
                  choices: Vec<String>,
                  default: Option<usize>|
                  -> Result<String, Error> {
                let default = default.unwrap_or(0);
                if default >= choices.len().max(1) {
                    return Err(script_error(format!(
                        "default choice {default} is out of range for '{message}'"
                    )));
                }
                prompter
                    .select(&message, &choices, default)
                    .map_err(|e| script_error(e.to_string()))
            },
        );

        if self.options.allow_commands {
            let root = project_root.to_path_buf();
            env.add_function(
                "run_command",
                move |program: String, args: Rest<String>| -> Result<String, Error> {
                    run_command(&root, &program, &args)
                },
            );
        }

        env
    }
}

fn run_command(root: &Path, program: &str, args: &[String]) -> Result<String, Error> {
    debug!("Running command '{program}' in {}", root.display());
    let mut command = Command::new(program);
    command.args(args).current_dir(root).env_clear();
    if let Some(path) = std::env::var_os("PATH") {
        command.env("PATH", path);
    }

    let output = command
        .output()
        .map_err(|e| script_error(format!("cannot run '{program}': {e}")))?;
    if !output.status.success() {
        return Err(script_error(format!(
            "'{program}' failed with status: {}",
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn resolve(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn lock(params: &Mutex<ParamMap>) -> MutexGuard<'_, ParamMap> {
    params.lock().unwrap_or_else(PoisonError::into_inner)
}

fn script_error<S: Into<String>>(message: S) -> Error {
    Error::new(ErrorKind::InvalidOperation, message.into())
}
