//! Command-line interface implementation for Boiler.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for Boiler.
#[derive(Parser, Debug)]
#[command(author, version, about = "Boiler: generate boilerplate from template packages", long_about = None)]
pub struct Args {
    /// Name of the package holding the template
    #[arg(value_name = "PACKAGE")]
    pub package: String,

    /// Name of the template to generate
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Template arguments: one positional value and `--name [value]` pairs.
    /// Everything after TEMPLATE is passed to the template, so boiler's own
    /// options must come before PACKAGE.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Directory where files are generated
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Directory containing `boiler/packages`; defaults to the project directory
    #[arg(long, value_name = "DIR")]
    pub boiler_dir: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Allow hook scripts to run external commands through `run_command`
    #[arg(long)]
    pub allow_commands: bool,
}

impl Args {
    /// Directory packages are looked up in.
    pub fn boiler_root(&self) -> PathBuf {
        self.boiler_dir.clone().unwrap_or_else(|| self.project_dir.clone())
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
