//! `scaffold new` command.

use std::time::Duration;

use console::Term;

use crate::cli::NewArgs;
use crate::config::{ScaffoldOptions, StepToggles};
use crate::context::ServiceContext;
use crate::error::ScaffoldError;
use crate::naming::ProjectName;
use crate::reporter::Reporter;
use crate::scaffold::{self, ScaffoldReport};

/// Execute the `new` command.
///
/// # Errors
///
/// Returns an error string if the name is invalid or the run fails fatally.
pub fn run(ctx: &ServiceContext, args: &NewArgs, reporter: &Reporter) -> Result<(), String> {
    let raw = match &args.name {
        Some(name) => name.clone(),
        None => prompt_name().map_err(|e| e.to_string())?,
    };
    let name = ProjectName::parse(&raw).map_err(|e| e.to_string())?;
    if name.as_str() != raw {
        reporter.info(&format!("using project name {name}"));
    }

    let mut options = options_from(args, name);
    if args.description.is_none() && Term::stderr().is_term() {
        options.description = prompt_description().map_err(|e| e.to_string())?;
    }
    let report = scaffold::run(ctx, &options, reporter).map_err(|e| e.to_string())?;

    reporter.warnings(&report.warnings);
    if !report.dry_run {
        reporter.block(&next_steps(&report));
    }
    Ok(())
}

fn prompt_name() -> Result<String, ScaffoldError> {
    let term = Term::stderr();
    term.write_str("Project name: ")?;
    Ok(term.read_line()?.trim().to_string())
}

fn prompt_description() -> Result<Option<String>, ScaffoldError> {
    let term = Term::stderr();
    term.write_str("Project description (optional): ")?;
    let line = term.read_line()?;
    Ok(Some(line.trim().to_string()).filter(|d| !d.is_empty()))
}

/// Builds run options from command-line arguments.
#[must_use]
pub fn options_from(args: &NewArgs, name: ProjectName) -> ScaffoldOptions {
    let mut options = ScaffoldOptions::new(name, &args.source);
    if let Some(target) = &args.target {
        options.target.clone_from(target);
    }
    options.description = args.description.clone().filter(|d| !d.trim().is_empty());
    options.overwrite = args.force;
    options.dry_run = args.dry_run;
    options.timeout = Duration::from_secs(args.timeout);
    options.steps = StepToggles {
        env_files: !args.skip_env,
        git: !args.skip_git,
        install: !args.skip_deps,
        summary: !args.skip_summary,
    };
    options
}

fn next_steps(report: &ScaffoldReport) -> String {
    format!(
        "\nNext steps:\n\
         \x20 cd {}\n\
         \x20 cd backend && python dev.py server   # API on http://localhost:8000\n\
         \x20 cd frontend && node dev.js server    # app on http://localhost:5173\n\
         \x20 See PROJECT_SUMMARY.md and README.md for details.",
        report.target.display()
    )
}
