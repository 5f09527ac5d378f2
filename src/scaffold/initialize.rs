//! Optional post-generation steps.
//!
//! None of these steps can fail a run: every problem becomes an
//! [`OptionalStepWarning`] in the report and the remaining steps still run.

use std::fmt::Write;
use std::path::Path;
use std::time::Duration;

use crate::config::{Installer, StepToggles, TemplateManifest};
use crate::context::ServiceContext;
use crate::error::OptionalStepWarning;
use crate::naming::{NameStyle, NameVariantSet};
use crate::reporter::Reporter;

/// Name of the generated summary file.
pub const SUMMARY_FILE: &str = "PROJECT_SUMMARY.md";

/// Subdirectories whose `.env.example` is copied to `.env`.
const ENV_DIRS: &[&str] = &["backend", "frontend"];

const DEFAULT_GITIGNORE: &str = "\
# Python
__pycache__/
*.py[cod]
*.egg-info/
build/
dist/

# Virtual environments
venv/
.venv/

# Environment variables
.env
.env.local
.env.*.local

# Database
*.db
*.sqlite3

# Node.js
node_modules/
npm-debug.log*
.vite/

# Editors and OS
.vscode/
.idea/
.DS_Store
Thumbs.db

# Logs and temporary files
*.log
*.tmp
";

/// Inputs of the post-generation steps.
pub struct InitRequest<'a> {
    /// The generated project root.
    pub target: &'a Path,
    /// Name variants of the new project.
    pub variants: &'a NameVariantSet,
    /// Description of the new project.
    pub description: &'a str,
    /// Manifest of the template the project came from.
    pub manifest: &'a TemplateManifest,
    /// Which steps run.
    pub steps: StepToggles,
    /// Timeout for each subprocess.
    pub timeout: Duration,
}

/// Runs the enabled steps in order and returns their warnings.
pub fn initialize(
    ctx: &ServiceContext,
    request: &InitRequest<'_>,
    reporter: &Reporter,
) -> Vec<OptionalStepWarning> {
    let mut warnings = Vec::new();
    let mut record = |result: Result<(), OptionalStepWarning>| {
        if let Err(warning) = result {
            tracing::warn!(step = %warning.step, "{}", warning.message);
            reporter.warn(&warning.to_string());
            warnings.push(warning);
        }
    };

    if request.steps.git {
        record(init_git(ctx, request, reporter));
    }
    if request.steps.env_files {
        for dir in ENV_DIRS {
            record(copy_env_file(ctx, request.target, dir, reporter));
        }
    }
    if request.steps.install {
        for installer in &request.manifest.installers {
            record(run_installer(
                ctx,
                request.target,
                installer,
                request.timeout,
                reporter,
            ));
        }
    }
    if request.steps.summary {
        record(write_summary(ctx, request, reporter));
    }
    warnings
}

fn init_git(
    ctx: &ServiceContext,
    request: &InitRequest<'_>,
    reporter: &Reporter,
) -> Result<(), OptionalStepWarning> {
    let fail = |what: &str, e: &dyn std::fmt::Display| {
        OptionalStepWarning::new("git", format!("{what} failed: {e}"))
    };
    let target = request.target;

    ctx.git.init(target).map_err(|e| fail("git init", &e))?;

    let gitignore = target.join(".gitignore");
    if !ctx.fs.exists(&gitignore) {
        ctx.fs
            .write_atomic(&gitignore, DEFAULT_GITIGNORE.as_bytes(), None)
            .map_err(|e| fail("writing .gitignore", &e))?;
        reporter.info("created default .gitignore");
    }

    ctx.git.add_all(target).map_err(|e| fail("git add", &e))?;
    let message = commit_message(request.variants, &request.manifest.name);
    let hash = ctx
        .git
        .commit(target, &message)
        .map_err(|e| fail("git commit", &e))?;

    let short: String = hash.chars().take(7).collect();
    reporter.success(&format!("initial commit {short}"));
    Ok(())
}

/// Message of the first commit in a generated repository.
#[must_use]
pub fn commit_message(variants: &NameVariantSet, template: &str) -> String {
    format!(
        "Initial commit: {}\n\nGenerated from the {template} template.",
        variants.get(NameStyle::Title)
    )
}

fn copy_env_file(
    ctx: &ServiceContext,
    target: &Path,
    dir: &str,
    reporter: &Reporter,
) -> Result<(), OptionalStepWarning> {
    let example = target.join(dir).join(".env.example");
    let env = target.join(dir).join(".env");
    if !ctx.fs.exists(&example) || ctx.fs.exists(&env) {
        return Ok(());
    }
    let fail = |e: &dyn std::fmt::Display| {
        OptionalStepWarning::new(
            format!("env:{dir}"),
            format!("could not create {dir}/.env: {e}"),
        )
    };
    let contents = ctx.fs.read(&example).map_err(|e| fail(&e))?;
    ctx.fs
        .write_atomic(&env, &contents, None)
        .map_err(|e| fail(&e))?;
    reporter.success(&format!("created {dir}/.env from .env.example"));
    Ok(())
}

fn run_installer(
    ctx: &ServiceContext,
    target: &Path,
    installer: &Installer,
    timeout: Duration,
    reporter: &Reporter,
) -> Result<(), OptionalStepWarning> {
    let dir = target.join(&installer.dir);
    if !ctx.fs.exists(&dir.join(&installer.marker)) {
        tracing::debug!(
            installer = %installer.name,
            marker = %installer.marker,
            "marker missing, skipping"
        );
        return Ok(());
    }
    let step = format!("install:{}", installer.name);
    reporter.info(&format!("installing {} dependencies", installer.name));

    for command in &installer.commands {
        tracing::info!(installer = %installer.name, command = %command, "running");
        let output = ctx.shell.run(command, &dir, timeout).map_err(|e| {
            OptionalStepWarning::new(&step, format!("`{command}` could not run: {e}"))
        })?;
        if !output.success() {
            let detail = output
                .stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(|l| format!(": {}", l.trim()))
                .unwrap_or_default();
            let code = output.exit_code;
            return Err(OptionalStepWarning::new(
                &step,
                format!("`{command}` exited with {code}{detail}; run it by hand"),
            ));
        }
    }
    reporter.success(&format!("{} dependencies installed", installer.name));
    Ok(())
}

fn write_summary(
    ctx: &ServiceContext,
    request: &InitRequest<'_>,
    reporter: &Reporter,
) -> Result<(), OptionalStepWarning> {
    let text = summary_text(
        request.variants,
        request.description,
        &request.manifest.name,
        &ctx.clock.now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    ctx.fs
        .write_atomic(&request.target.join(SUMMARY_FILE), text.as_bytes(), None)
        .map_err(|e| {
            OptionalStepWarning::new("summary", format!("could not write {SUMMARY_FILE}: {e}"))
        })?;
    reporter.success(&format!("wrote {SUMMARY_FILE}"));
    Ok(())
}

fn summary_text(
    variants: &NameVariantSet,
    description: &str,
    template: &str,
    generated: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", variants.get(NameStyle::Title));
    let _ = writeln!(out, "{description}\n");
    out.push_str("## Project Information\n\n");
    let _ = writeln!(out, "- **Name**: {}", variants.get(NameStyle::Kebab));
    let _ = writeln!(out, "- **Description**: {description}");
    let _ = writeln!(out, "- **Generated**: {generated}");
    let _ = writeln!(out, "- **Template**: {template}\n");
    out.push_str(
        "## Quick Start\n\n\
         ### Backend\n\
         ```bash\n\
         cd backend\n\
         source venv/bin/activate  # Windows: venv\\Scripts\\activate\n\
         python dev.py server\n\
         ```\n\n\
         ### Frontend\n\
         ```bash\n\
         cd frontend\n\
         node dev.js server\n\
         ```\n\n\
         ### Access\n\
         - Frontend: http://localhost:5173\n\
         - Backend API: http://localhost:8000\n\
         - API Docs: http://localhost:8000/docs\n",
    );
    out
}
