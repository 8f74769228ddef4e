//! Common constants used throughout the Boiler application.

/// Supported package configuration file names, in lookup order
pub const CONFIG_FILES: [&str; 3] = ["boiler.json", "boiler.yml", "boiler.yaml"];

/// Directory holding boiler data inside a project
pub const BOILER_DIRNAME: &str = "boiler";

/// Directory holding packages inside the boiler directory
pub const PACKAGES_DIRNAME: &str = "packages";

pub const TEMPLATES_DIRNAME: &str = "templates";
pub const SCRIPTS_DIRNAME: &str = "scripts";

/// Suffix of template files inside a package's templates directory
pub const TEMPLATE_EXT: &str = ".boiler";

/// Suffix of hook scripts inside a package's scripts directory
pub const SCRIPT_EXT: &str = ".j2";

/// Package-level hooks run around the whole generation
pub const BEFORE_HOOK: &str = "before";
pub const AFTER_HOOK: &str = "after";

/// Suffix of custom prompt scripts (`<param>-prompt`)
pub const PROMPT_HOOK_SUFFIX: &str = "-prompt";
