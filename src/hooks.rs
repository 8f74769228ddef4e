//! Hook script discovery and execution.
//!
//! Hooks are optional: a missing script file is not an error, the hook is
//! simply reported as not run.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::prompt::Prompter;
use crate::script::{ScriptEngine, ScriptOptions};
use crate::substitution::ParamMap;

/// What a hook sees while it runs.
pub struct HookContext<'a> {
    /// Working directory of the script
    pub project_root: &'a Path,
    /// Output directory of the template node or file the hook belongs to
    pub out_dir: &'a Path,
    /// The shared parameter map; changes are visible to everything that runs later
    pub params: &'a mut ParamMap,
}

/// Trait for hook execution backends.
pub trait HookRunner {
    /// Runs the script at `script_path` if it exists.
    ///
    /// # Returns
    /// * `Ok(false)` - No script exists at `script_path`
    /// * `Ok(true)` - The script ran successfully
    ///
    /// # Errors
    /// * `Error::ScriptExecutionError` if the script fails
    fn run_hook(&self, script_path: &Path, context: &mut HookContext<'_>) -> Result<bool>;

    /// Evaluates the script of a virtual parameter against a snapshot of `params`.
    ///
    /// Returns `None` when the script produces no value.
    fn run_param_script(
        &self,
        project_root: &Path,
        code: &str,
        params: &ParamMap,
    ) -> Result<Option<String>>;
}

/// Runs hooks through the embedded [`ScriptEngine`].
pub struct ScriptHookRunner {
    engine: ScriptEngine,
}

impl ScriptHookRunner {
    pub fn new(prompter: Arc<dyn Prompter>, options: ScriptOptions) -> Self {
        Self { engine: ScriptEngine::new(prompter, options) }
    }
}

impl HookRunner for ScriptHookRunner {
    fn run_hook(&self, script_path: &Path, context: &mut HookContext<'_>) -> Result<bool> {
        if !script_path.is_file() {
            return Ok(false);
        }

        debug!("Running hook {}", script_path.display());
        let source = fs::read_to_string(script_path)?;
        let script = script_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let output = self
            .engine
            .run(&source, context.project_root, context.out_dir, context.params)
            .map_err(|e| Error::ScriptExecutionError { script, message: e.to_string() })?;

        let output = output.trim();
        if !output.is_empty() {
            info!("{output}");
        }
        Ok(true)
    }

    fn run_param_script(
        &self,
        project_root: &Path,
        code: &str,
        params: &ParamMap,
    ) -> Result<Option<String>> {
        // Scripts with no body exist only to bail out early.
        if code.trim().is_empty() {
            return Ok(None);
        }

        let mut snapshot = params.clone();
        let output = self
            .engine
            .run(code, project_root, Path::new(""), &mut snapshot)
            .map_err(|e| Error::ScriptExecutionError {
                script: code.trim().to_string(),
                message: e.to_string(),
            })?;

        let value = output.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }
}
