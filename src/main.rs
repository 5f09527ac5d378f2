//! Binary entrypoint for the `scaffold` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Values in .env never override variables already set.
    dotenvy::dotenv().ok();

    // Recording is handled in commands::dispatch via SCAFFOLD_RECORD=<file>.
    match webapp_scaffold::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
