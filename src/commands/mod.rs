//! Command dispatch and handlers.

pub mod names;
pub mod new;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::{Cli, Command};
use crate::context::ServiceContext;
use crate::reporter::Reporter;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let reporter = Reporter::stdout(!cli.no_color, cli.quiet);
    match &cli.command {
        Command::New(args) => with_context(Duration::from_secs(args.timeout), |ctx| {
            new::run(ctx, args, &reporter)
        }),
        Command::Names { name } => names::run(name),
    }
}

/// Runs `f` with a live context.
///
/// When `SCAFFOLD_RECORD` is set to a file path, every git and shell
/// interaction is recorded to a cassette at that path.
fn with_context<F>(timeout: Duration, f: F) -> Result<(), String>
where
    F: FnOnce(&ServiceContext) -> Result<(), String>,
{
    let Ok(path) = env::var("SCAFFOLD_RECORD") else {
        return f(&ServiceContext::live(timeout));
    };

    let ctx = ServiceContext::recording(&PathBuf::from(path), timeout);
    let result = f(&ctx);

    // Write the cassette even when the command failed.
    if let Some(written) = ctx.finish()? {
        eprintln!("Recording saved to: {}", written.display());
    }
    result
}
