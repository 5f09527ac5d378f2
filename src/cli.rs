//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_TIMEOUT;

/// Top-level CLI parser for `scaffold`.
#[derive(Debug, Parser)]
#[command(
    name = "scaffold",
    version,
    about = "Generate a new full-stack web application from a template"
)]
pub struct Cli {
    /// Diagnostic log filter written to stderr (e.g. `debug`, `webapp_scaffold=trace`).
    #[arg(long, global = true, env = "SCAFFOLD_LOG", default_value = "warn")]
    pub log_level: String,

    /// Disable coloured output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Only print warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new project from the template.
    New(NewArgs),
    /// Show how a name is sanitized and spelled in every naming convention.
    Names {
        /// Raw project name.
        name: String,
    },
}

/// Arguments of `scaffold new`.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct NewArgs {
    /// Project name; prompted for when omitted.
    #[arg(short, long)]
    pub name: Option<String>,

    /// One-line project description; prompted for on a terminal when omitted.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Directory to generate into; must lie outside the template
    /// [default: <name> next to the template directory].
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Template directory to copy from.
    #[arg(short, long, env = "SCAFFOLD_SOURCE", default_value = ".")]
    pub source: PathBuf,

    /// Write into a non-empty target directory.
    #[arg(long)]
    pub force: bool,

    /// Skip dependency installation.
    #[arg(long)]
    pub skip_deps: bool,

    /// Skip git initialization.
    #[arg(long)]
    pub skip_git: bool,

    /// Skip creating `.env` files from `.env.example`.
    #[arg(long)]
    pub skip_env: bool,

    /// Skip writing PROJECT_SUMMARY.md.
    #[arg(long)]
    pub skip_summary: bool,

    /// Print what would be written and stop.
    #[arg(long)]
    pub dry_run: bool,

    /// Timeout in seconds for each git or installer command.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,
}
