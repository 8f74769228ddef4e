#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use boiler::config::{load_config, PackageConfig};
use boiler::error::{Error, Result};
use boiler::hooks::{HookContext, HookRunner};
use boiler::layout::PackageLayout;
use boiler::prompt::Prompter;
use boiler::substitution::ParamMap;
use tempfile::TempDir;

pub fn params(pairs: &[(&str, &str)]) -> ParamMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Answers prompts from a fixed queue and remembers every question.
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    fn next_answer(&self, message: &str) -> Result<String> {
        self.asked.lock().unwrap().push(message.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::PromptError(format!("no scripted answer for '{message}'")))
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&self, message: &str, _default: Option<&str>) -> Result<String> {
        self.next_answer(message)
    }

    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        Ok(self.next_answer(message)? == "y")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HookCall {
    pub script: String,
    pub out_dir: PathBuf,
}

/// Hook runner that records calls instead of running scripts.
#[derive(Default)]
pub struct FakeHooks {
    pub calls: RefCell<Vec<HookCall>>,
    pub hook_params: RefCell<Vec<ParamMap>>,
    pub script_params: RefCell<Vec<ParamMap>>,
    counter: Option<String>,
    prompt_scripts: HashMap<String, Option<(String, String)>>,
    param_scripts: HashMap<String, String>,
}

impl FakeHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every hook "exists" and appends `x` to `param`.
    pub fn counting(mut self, param: &str) -> Self {
        self.counter = Some(param.to_string());
        self
    }

    /// The hook `script` exists and optionally sets `param = value`.
    pub fn with_prompt_script(mut self, script: &str, sets: Option<(&str, &str)>) -> Self {
        self.prompt_scripts
            .insert(script.to_string(), sets.map(|(p, v)| (p.to_string(), v.to_string())));
        self
    }

    pub fn with_param_script(mut self, code: &str, value: &str) -> Self {
        self.param_scripts.insert(code.to_string(), value.to_string());
        self
    }

    pub fn scripts(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|call| call.script.clone()).collect()
    }
}

impl HookRunner for FakeHooks {
    fn run_hook(&self, script_path: &Path, context: &mut HookContext<'_>) -> Result<bool> {
        let file_name = script_path.file_name().unwrap().to_string_lossy().into_owned();
        let script = file_name.strip_suffix(".j2").unwrap_or(&file_name).to_string();
        self.calls
            .borrow_mut()
            .push(HookCall { script: script.clone(), out_dir: context.out_dir.to_path_buf() });
        self.hook_params.borrow_mut().push(context.params.clone());

        if let Some(counter) = &self.counter {
            context.params.entry(counter.clone()).or_default().push('x');
            return Ok(true);
        }
        match self.prompt_scripts.get(&script) {
            Some(Some((param, value))) => {
                context.params.insert(param.clone(), value.clone());
                Ok(true)
            }
            Some(None) => Ok(true),
            None => Ok(false),
        }
    }

    fn run_param_script(
        &self,
        _project_root: &Path,
        code: &str,
        params: &ParamMap,
    ) -> Result<Option<String>> {
        self.script_params.borrow_mut().push(params.clone());
        Ok(self.param_scripts.get(code).cloned())
    }
}

/// A package written into a temporary boiler root.
pub struct TestPackage {
    pub root: TempDir,
    pub layout: PackageLayout,
}

impl TestPackage {
    pub fn new(name: &str, config: serde_json::Value) -> Self {
        let root = TempDir::new().unwrap();
        let layout = PackageLayout::new(root.path(), name);
        fs::create_dir_all(layout.templates_dir()).unwrap();
        fs::create_dir_all(layout.scripts_dir()).unwrap();
        fs::write(
            layout.package_dir().join("boiler.json"),
            serde_json::to_string_pretty(&config).unwrap(),
        )
        .unwrap();
        Self { root, layout }
    }

    pub fn template(&self, name: &str, content: &str) -> &Self {
        fs::write(self.layout.template_path(name), content).unwrap();
        self
    }

    pub fn script(&self, name: &str, content: &str) -> &Self {
        fs::write(self.layout.script_path(name), content).unwrap();
        self
    }

    pub fn config(&self) -> PackageConfig {
        load_config(self.layout.package_dir()).unwrap()
    }
}
