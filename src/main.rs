//! Boiler's main application entry point.
//! Parses the command line and hands a single generation request to the engine.

use std::sync::Arc;

use boiler::{
    cli::{get_args, Args},
    error::{default_error_handler, Result},
    hooks::ScriptHookRunner,
    logger::init_logger,
    processor::{Generator, LogReporter},
    prompt::{DialoguerPrompter, Prompter},
    script::ScriptOptions,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Sets up the prompt backend and the script host
/// 2. Resolves template parameters from arguments, scripts and prompts
/// 3. Generates the template tree into the project directory
fn run(args: Args) -> Result<()> {
    let prompt: Arc<dyn Prompter> = Arc::new(DialoguerPrompter::new());
    let hooks = ScriptHookRunner::new(
        Arc::clone(&prompt),
        ScriptOptions { allow_commands: args.allow_commands },
    );
    let reporter = LogReporter;

    let boiler_root = args.boiler_root();
    let generator = Generator::new(&hooks, &*prompt, &reporter);
    generator.generate_boilerplate(
        &args.project_dir,
        &boiler_root,
        &args.package,
        &args.template,
        &args.args,
    )?;

    log::info!("Template '{}' generated in {}.", args.template, args.project_dir.display());
    Ok(())
}
