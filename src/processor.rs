//! Core generation orchestration.
//! Walks a template's include tree, runs hooks around every node and file,
//! and writes substituted template files into the project.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::{load_config, PackageConfig};
use crate::constants::{AFTER_HOOK, BEFORE_HOOK, TEMPLATE_EXT};
use crate::error::{Error, Result};
use crate::hooks::{HookContext, HookRunner};
use crate::layout::{template_base_name, PackageLayout};
use crate::parser::ParamResolver;
use crate::prompt::{Prompter, Retries};
use crate::substitution::{apply_output_replacements, fold_replace_rules, substitute, ParamMap};

/// Receives an event for every generated file.
pub trait Reporter {
    fn file_written(&self, path: &Path);
}

/// Reports generated files through the `log` facade.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn file_written(&self, path: &Path) {
        info!("+ {}", path.display());
    }
}

/// State handed from a template node to its includes.
pub struct GenerationContext<'a> {
    /// The run's single parameter map, shared by reference
    pub params: &'a mut ParamMap,
    /// Replace-rule values of the closest ancestor declaring `replace`
    pub hardcoded_params: Option<&'a ParamMap>,
    /// Output directory relative to the project root
    pub out_dir: PathBuf,
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).map_err(Error::IoError)
}

fn join_out_dir(base: &Path, dir: Option<&str>) -> PathBuf {
    match dir {
        Some(dir) => base.join(dir),
        None => base.to_path_buf(),
    }
}

/// Generates the files of one template tree.
pub struct Processor<'a> {
    project_root: &'a Path,
    layout: &'a PackageLayout,
    config: &'a PackageConfig,
    hooks: &'a dyn HookRunner,
    reporter: &'a dyn Reporter,
}

impl<'a> Processor<'a> {
    pub fn new(
        project_root: &'a Path,
        layout: &'a PackageLayout,
        config: &'a PackageConfig,
        hooks: &'a dyn HookRunner,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self { project_root, layout, config, hooks, reporter }
    }

    /// Generates `template_name` between the package's `before` and `after` hooks.
    ///
    /// Files written before an error stay on disk.
    pub fn generate(&self, template_name: &str, params: &mut ParamMap) -> Result<()> {
        self.run_hook(BEFORE_HOOK, Path::new(""), params)?;

        let mut context = GenerationContext {
            params: &mut *params,
            hardcoded_params: None,
            out_dir: PathBuf::new(),
        };
        self.generate_template(template_name, &mut context, &mut Vec::new())?;

        self.run_hook(AFTER_HOOK, Path::new(""), params)?;
        Ok(())
    }

    fn generate_template(
        &self,
        name: &str,
        context: &mut GenerationContext<'_>,
        chain: &mut Vec<String>,
    ) -> Result<()> {
        let template = self.config.require_template(self.layout.name(), name)?;
        debug!("Processing template '{name}'");

        let folded = if template.replace.is_empty() {
            None
        } else {
            Some(fold_replace_rules(context.hardcoded_params, &template.replace, context.params)?)
        };
        let hardcoded_params = folded.as_ref().or(context.hardcoded_params);

        let out_dir = join_out_dir(&context.out_dir, template.out_dir.as_deref());
        self.run_hook(&format!("before-{name}"), &out_dir, context.params)?;

        chain.push(name.to_string());
        for include in &template.include {
            let include = include.to_ref();
            let mut child = GenerationContext {
                params: &mut *context.params,
                hardcoded_params,
                out_dir: join_out_dir(&out_dir, include.out_dir.as_deref()),
            };

            if self.layout.template_path(&include.name).is_file() {
                self.generate_file(&include.name, &mut child)?;
            } else {
                if chain.contains(&include.name) {
                    return Err(Error::TemplateCycle {
                        chain: format!("{} -> {}", chain.join(" -> "), include.name),
                        template: include.name,
                    });
                }
                self.generate_template(&include.name, &mut child, chain)?;
            }
        }
        chain.pop();

        self.run_hook(&format!("after-{name}"), &out_dir, context.params)?;
        Ok(())
    }

    fn generate_file(&self, name: &str, context: &mut GenerationContext<'_>) -> Result<()> {
        self.run_hook(&format!("before-{name}"), &context.out_dir, context.params)?;
        self.run_hook(&format!("before-{name}{TEMPLATE_EXT}"), &context.out_dir, context.params)?;

        let template_path = self.layout.template_path(name);
        debug!("Rendering {}", template_path.display());
        let raw = fs::read_to_string(&template_path)?;
        let mut content = substitute(&raw, context.params);
        if let Some(hardcoded) = context.hardcoded_params {
            content = substitute(&content, hardcoded);
        }

        let relative = substitute(&context.out_dir.join(name).to_string_lossy(), context.params);
        let relative =
            apply_output_replacements(&relative, self.config.output_replace_rules(), context.params)?;
        let target = self.project_root.join(relative);
        write_file(&target, &content)?;

        self.run_hook(&format!("after-{name}"), &context.out_dir, context.params)?;
        self.run_hook(&format!("after-{name}{TEMPLATE_EXT}"), &context.out_dir, context.params)?;

        self.reporter.file_written(&target);
        Ok(())
    }

    fn run_hook(&self, name: &str, out_dir: &Path, params: &mut ParamMap) -> Result<bool> {
        let mut context = HookContext { project_root: self.project_root, out_dir, params };
        self.hooks.run_hook(&self.layout.script_path(name), &mut context)
    }
}

/// Entry point of a generation run: resolves parameters, then processes the template tree.
pub struct Generator<'a> {
    hooks: &'a dyn HookRunner,
    prompt: &'a dyn Prompter,
    reporter: &'a dyn Reporter,
    retries: Retries,
}

impl<'a> Generator<'a> {
    pub fn new(
        hooks: &'a dyn HookRunner,
        prompt: &'a dyn Prompter,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self { hooks, prompt, reporter, retries: Retries::Indefinite }
    }

    /// Overrides the retry policy of interactive parameter prompts.
    pub fn with_retries(mut self, retries: Retries) -> Self {
        self.retries = retries;
        self
    }

    /// Generates `template_name` of package `package_name` into `project_root`.
    ///
    /// # Arguments
    /// * `project_root` - Directory receiving the generated files
    /// * `boiler_root` - Directory containing `boiler/packages/<package_name>`
    /// * `package_name` - Package to generate from
    /// * `template_name` - Template node to generate; a trailing `.boiler` is ignored
    /// * `args` - Template arguments, e.g. `["Dog", "--package", "com.example"]`
    ///
    /// # Returns
    /// * `Result<ParamMap>` - The final parameter map, including hook changes
    pub fn generate_boilerplate<S: AsRef<str>>(
        &self,
        project_root: &Path,
        boiler_root: &Path,
        package_name: &str,
        template_name: &str,
        args: &[S],
    ) -> Result<ParamMap> {
        let layout = PackageLayout::new(boiler_root, package_name);
        layout.ensure_exists()?;
        let template_name = template_base_name(template_name);
        let config = load_config(layout.package_dir())?;

        let mut params = ParamResolver::new(self.hooks, self.prompt)
            .with_retries(self.retries)
            .resolve_params(project_root, &layout, &config, template_name, args)?;

        Processor::new(project_root, &layout, &config, self.hooks, self.reporter)
            .generate(template_name, &mut params)?;

        Ok(params)
    }
}
