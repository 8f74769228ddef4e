//! Filesystem layout of boiler packages.
//!
//! A package named `java` under the boiler root `/work` lives in
//! `/work/boiler/packages/java/` and holds its configuration file, a
//! `templates/` directory and a `scripts/` directory.

use crate::constants::{
    BOILER_DIRNAME, CONFIG_FILES, PACKAGES_DIRNAME, SCRIPTS_DIRNAME, SCRIPT_EXT, TEMPLATES_DIRNAME,
    TEMPLATE_EXT,
};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Resolved paths of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    name: String,
    package_dir: PathBuf,
}

impl PackageLayout {
    pub fn new<P: AsRef<Path>, S: Into<String>>(boiler_root: P, package_name: S) -> Self {
        let name = package_name.into();
        let package_dir =
            boiler_root.as_ref().join(BOILER_DIRNAME).join(PACKAGES_DIRNAME).join(&name);
        Self { name, package_dir }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.package_dir.join(TEMPLATES_DIRNAME)
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.package_dir.join(SCRIPTS_DIRNAME)
    }

    /// Path of the template file backing a leaf include (`<name>.boiler`).
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.templates_dir().join(format!("{name}{TEMPLATE_EXT}"))
    }

    /// Path of the hook script called `name` (`<name>.j2`).
    pub fn script_path(&self, name: &str) -> PathBuf {
        self.scripts_dir().join(format!("{name}{SCRIPT_EXT}"))
    }

    /// Fails with `PackageNotFound` unless the package directory holds a configuration file.
    pub fn ensure_exists(&self) -> Result<()> {
        let has_config = CONFIG_FILES.iter().any(|file| self.package_dir.join(file).is_file());
        if !self.package_dir.is_dir() || !has_config {
            let boiler_dir = self.package_dir.parent().unwrap_or(&self.package_dir);
            return Err(Error::PackageNotFound {
                package: self.name.clone(),
                boiler_dir: boiler_dir.display().to_string(),
            });
        }
        Ok(())
    }
}

/// Strips a trailing template extension from a template name given on the command line.
pub fn template_base_name(name: &str) -> &str {
    name.strip_suffix(TEMPLATE_EXT).unwrap_or(name)
}
