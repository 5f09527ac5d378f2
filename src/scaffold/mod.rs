//! The scaffold pipeline: collect, substitute, plan, materialize, initialize.

pub mod initialize;
pub mod materialize;
pub mod plan;
pub mod stage;

use std::path::PathBuf;

pub use stage::Stage;

use crate::config::{
    target_within, ScaffoldOptions, TemplateManifest, DEFAULT_DESCRIPTION, MANIFEST_FILE,
};
use crate::context::ServiceContext;
use crate::error::{OptionalStepWarning, ScaffoldError, StageError};
use crate::naming::NameVariantSet;
use crate::reporter::Reporter;
use crate::substitute::Substitution;
use crate::template::{Collector, ExclusionSet, TemplateFile};

use self::initialize::{initialize, InitRequest};
use self::materialize::{check_target, materialize};
use self::plan::{format_plan, plan_scaffold, ScaffoldPlan};

/// Outcome of a scaffold run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    /// Directory the project was generated into.
    pub target: PathBuf,
    /// Number of files written (zero for a dry run).
    pub files_written: usize,
    /// Number of files whose contents were renamed.
    pub files_changed: usize,
    /// Optional steps that did not complete.
    pub warnings: Vec<OptionalStepWarning>,
    /// Stage the run ended in.
    pub stage: Stage,
    /// Whether the run stopped after planning.
    pub dry_run: bool,
}

struct Progress<'r> {
    stage: Stage,
    reporter: &'r Reporter,
}

impl Progress<'_> {
    fn advance(&mut self) {
        let next = self.stage.next();
        tracing::info!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
        self.reporter.stage(next);
    }

    fn fail(&self, source: ScaffoldError) -> StageError {
        tracing::error!(stage = %self.stage, error = %source, "scaffold failed");
        self.reporter.stage(Stage::Failed);
        StageError {
            stage: self.stage,
            source,
        }
    }
}

/// Generates a project from a template.
///
/// # Errors
///
/// Returns a [`StageError`] naming the stage that failed and the fatal
/// [`ScaffoldError`] behind it. Failures of optional post-generation steps
/// are reported as warnings instead.
pub fn run(
    ctx: &ServiceContext,
    options: &ScaffoldOptions,
    reporter: &Reporter,
) -> Result<ScaffoldReport, StageError> {
    let mut progress = Progress {
        stage: Stage::Collecting,
        reporter,
    };
    reporter.stage(Stage::Collecting);
    execute(ctx, options, &mut progress).map_err(|e| progress.fail(e))
}

fn execute(
    ctx: &ServiceContext,
    options: &ScaffoldOptions,
    progress: &mut Progress<'_>,
) -> Result<ScaffoldReport, ScaffoldError> {
    let reporter = progress.reporter;

    let manifest = TemplateManifest::load(ctx, &options.source)?;
    let files = collect(ctx, options, &manifest)?;
    reporter.success(&format!(
        "{} files from {}",
        files.len(),
        options.source.display()
    ));

    progress.advance();
    let old = manifest.variants()?;
    let variants = project_variants(&manifest, &old, options);
    let description = project_description(&manifest, options);
    let substitution = substitution_for(&manifest, &old, &variants, description);
    let substituted: Vec<(TemplateFile, bool)> = files
        .into_iter()
        .map(|file| substitution.apply_file(file))
        .collect();

    progress.advance();
    let plan = plan_scaffold(&options.target, substituted);
    reporter.success(&format!(
        "{} files to write, {} renamed",
        plan.files.len(),
        plan.substituted_count()
    ));

    if options.dry_run {
        return Ok(dry_run_report(ctx, options, &plan, reporter));
    }

    progress.advance();
    let files_written = materialize(ctx, &plan, options.overwrite)?;
    reporter.success(&format!(
        "{files_written} files written to {}",
        plan.target.display()
    ));

    progress.advance();
    let request = InitRequest {
        target: &plan.target,
        variants: &variants,
        description,
        manifest: &manifest,
        steps: options.steps,
        timeout: options.timeout,
    };
    let warnings = initialize(ctx, &request, reporter);

    progress.advance();
    Ok(ScaffoldReport {
        target: plan.target.clone(),
        files_written,
        files_changed: plan.substituted_count(),
        warnings,
        stage: progress.stage,
        dry_run: false,
    })
}

fn collect(
    ctx: &ServiceContext,
    options: &ScaffoldOptions,
    manifest: &TemplateManifest,
) -> Result<Vec<TemplateFile>, ScaffoldError> {
    if target_within(&options.source, &options.target).is_some() {
        return Err(ScaffoldError::TargetInsideSource {
            path: options.target.clone(),
            template: options.source.clone(),
        });
    }
    let exclusions = ExclusionSet::with_extra(&manifest.exclude)
        .map_err(|message| ScaffoldError::Manifest {
            path: options.source.join(MANIFEST_FILE),
            message,
        })?;
    Collector::new(ctx, &options.source, exclusions)
        .files()?
        .collect()
}

/// Variants of the new name. Reusing the template's own name keeps the
/// manifest's spellings, so the copy is verbatim.
fn project_variants(
    manifest: &TemplateManifest,
    template_variants: &NameVariantSet,
    options: &ScaffoldOptions,
) -> NameVariantSet {
    if options.name.as_str() == manifest.name {
        template_variants.clone()
    } else {
        NameVariantSet::derive(&options.name)
    }
}

/// The description written into the project. A copy under the template's
/// own name keeps the template's description unless a new one was given.
fn project_description<'a>(
    manifest: &'a TemplateManifest,
    options: &'a ScaffoldOptions,
) -> &'a str {
    match (&options.description, &manifest.description) {
        (Some(description), _) => description.as_str(),
        (None, Some(own)) if options.name.as_str() == manifest.name => own.as_str(),
        _ => DEFAULT_DESCRIPTION,
    }
}

fn substitution_for(
    manifest: &TemplateManifest,
    old: &NameVariantSet,
    new: &NameVariantSet,
    description: &str,
) -> Substitution {
    let substitution = Substitution::new(old, new);
    match &manifest.description {
        Some(own) => substitution.with_description(own, description),
        None => substitution,
    }
}

fn dry_run_report(
    ctx: &ServiceContext,
    options: &ScaffoldOptions,
    plan: &ScaffoldPlan,
    reporter: &Reporter,
) -> ScaffoldReport {
    reporter.block(&format_plan(plan));
    if let Err(e) = check_target(ctx, &plan.target, options.overwrite) {
        reporter.warn(&format!("a real run would fail: {e}"));
    }
    ScaffoldReport {
        target: plan.target.clone(),
        files_written: 0,
        files_changed: plan.substituted_count(),
        warnings: Vec::new(),
        stage: Stage::Planning,
        dry_run: true,
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::adapters::memory::MemoryFileSystem;
    use crate::config::{StepToggles, DEFAULT_TIMEOUT};
    use crate::naming::ProjectName;

    const TEMPLATE_README: &str = "# Starter Web App\n\nFull-stack template with FastAPI + React\n";

    fn template() -> MemoryFileSystem {
        let fs = MemoryFileSystem::new();
        fs.add_file("/tpl/README.md", TEMPLATE_README);
        fs.add_file("/tpl/package.json", r#"{"name": "starter-webapp"}"#);
        fs.add_file("/tpl/backend/app/config.py", "APP = 'starter_webapp'\n");
        fs.add_file("/tpl/backend/app/__pycache__/config.pyc", vec![0u8, 1]);
        fs.add_file("/tpl/frontend/node_modules/x/index.js", "x");
        fs.add_file("/tpl/frontend/public/favicon.ico", vec![0u8, 0, 1, 0, b's']);
        fs
    }

    fn options(name: &str) -> ScaffoldOptions {
        let mut opts = ScaffoldOptions::new(ProjectName::parse(name).unwrap(), "/tpl");
        opts.target = PathBuf::from("/out").join(opts.name.as_str());
        opts.steps = StepToggles::none();
        opts
    }

    fn ctx(fs: MemoryFileSystem) -> ServiceContext {
        ServiceContext::live(DEFAULT_TIMEOUT).with_filesystem(Box::new(fs))
    }

    fn read(ctx: &ServiceContext, path: &str) -> String {
        ctx.fs.read_to_string(Path::new(path)).unwrap()
    }

    #[test]
    fn generates_renamed_project() {
        let ctx = ctx(template());
        let reporter = Reporter::buffered();
        let mut opts = options("Blog Platform");
        opts.description = Some("A place to write".into());

        let report = run(&ctx, &opts, &reporter).unwrap();

        assert_eq!(report.stage, Stage::Done);
        assert_eq!(report.files_written, 4);
        assert_eq!(report.files_changed, 3);
        assert_eq!(
            read(&ctx, "/out/blog-platform/README.md"),
            "# Blog Platform\n\nA place to write\n"
        );
        assert_eq!(
            read(&ctx, "/out/blog-platform/package.json"),
            r#"{"name": "blog-platform"}"#
        );
        assert_eq!(
            read(&ctx, "/out/blog-platform/backend/app/config.py"),
            "APP = 'blog_platform'\n"
        );
        let target = Path::new("/out/blog-platform");
        assert!(!ctx.fs.exists(&target.join("frontend/node_modules")));
    }

    #[test]
    fn reports_one_line_per_stage() {
        let ctx = ctx(template());
        let reporter = Reporter::buffered();

        run(&ctx, &options("blog"), &reporter).unwrap();

        let stages: Vec<String> = reporter
            .lines()
            .into_iter()
            .filter(|l| l.starts_with("==>"))
            .collect();
        assert_eq!(
            stages,
            vec![
                "==> Collecting template files",
                "==> Renaming project references",
                "==> Planning output",
                "==> Writing project files",
                "==> Initializing project",
                "==> Project created",
            ]
        );
    }

    #[test]
    fn dry_run_writes_nothing() {
        let ctx = ctx(template());
        let reporter = Reporter::buffered();
        let mut opts = options("blog");
        opts.dry_run = true;

        let report = run(&ctx, &opts, &reporter).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.stage, Stage::Planning);
        assert_eq!(report.files_written, 0);
        assert!(!ctx.fs.exists(Path::new("/out/blog")));
        assert!(reporter.lines().iter().any(|l| l == "  REWRITE README.md"));
    }

    #[test]
    fn missing_source_fails_while_collecting() {
        let ctx = ctx(MemoryFileSystem::new());
        let reporter = Reporter::buffered();

        let err = run(&ctx, &options("blog"), &reporter).unwrap_err();

        assert_eq!(err.stage, Stage::Collecting);
        assert!(matches!(err.source, ScaffoldError::SourceNotFound { .. }));
        assert_eq!(
            reporter.lines().last().map(String::as_str),
            Some("==> Scaffolding failed")
        );
    }

    #[test]
    fn conflict_fails_while_materializing_and_keeps_existing_files() {
        let fs = template();
        fs.add_file("/out/blog/README.md", "mine");
        let ctx = ctx(fs);

        let err = run(&ctx, &options("blog"), &Reporter::buffered()).unwrap_err();

        assert_eq!(err.stage, Stage::Materializing);
        assert!(matches!(err.source, ScaffoldError::TargetConflict { .. }));
        assert_eq!(read(&ctx, "/out/blog/README.md"), "mine");
        assert!(!ctx.fs.exists(Path::new("/out/blog/package.json")));
    }

    #[test]
    fn manifest_extends_exclusions_and_names() {
        let fs = template();
        fs.add_file(
            "/tpl/scaffold.yaml",
            "name: starter-webapp\ntitle: Starter Web App\nexclude: ['*.md']\ninstallers: []\n",
        );
        let ctx = ctx(fs);

        let report = run(&ctx, &options("blog"), &Reporter::buffered()).unwrap();

        assert_eq!(report.files_written, 3);
        assert!(!ctx.fs.exists(Path::new("/out/blog/README.md")));
        assert!(!ctx.fs.exists(Path::new("/out/blog/scaffold.yaml")));
    }

    #[test]
    fn same_name_copies_template_verbatim() {
        let ctx = ctx(template());
        let mut opts = options("starter-webapp");
        opts.target = PathBuf::from("/out/copy");

        let report = run(&ctx, &opts, &Reporter::buffered()).unwrap();

        assert_eq!(report.files_changed, 0);
        assert_eq!(read(&ctx, "/out/copy/README.md"), TEMPLATE_README);
    }

    #[test]
    fn missing_description_falls_back_to_default() {
        let ctx = ctx(template());

        run(&ctx, &options("blog"), &Reporter::buffered()).unwrap();

        assert_eq!(
            read(&ctx, "/out/blog/README.md"),
            format!("# Blog\n\n{DEFAULT_DESCRIPTION}\n")
        );
    }

    #[test]
    fn target_inside_template_is_rejected_before_writing() {
        for target in ["/tpl/blog", "/tpl/."] {
            let ctx = ctx(template());
            let mut opts = options("blog");
            opts.target = PathBuf::from(target);
            opts.overwrite = true;

            let err = run(&ctx, &opts, &Reporter::buffered()).unwrap_err();

            assert_eq!(err.stage, Stage::Collecting);
            assert!(matches!(
                err.source,
                ScaffoldError::TargetInsideSource { .. }
            ));
            assert!(!ctx.fs.exists(Path::new("/tpl/blog")));
            assert_eq!(
                read(&ctx, "/tpl/package.json"),
                r#"{"name": "starter-webapp"}"#
            );
        }
    }
}
