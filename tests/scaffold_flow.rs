//! End-to-end pipeline tests on real temporary directories.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use walkdir::WalkDir;

use webapp_scaffold::adapters::live::clock::LiveClock;
use webapp_scaffold::adapters::live::filesystem::LiveFileSystem;
use webapp_scaffold::config::{ScaffoldOptions, StepToggles, DEFAULT_DESCRIPTION, DEFAULT_TIMEOUT};
use webapp_scaffold::context::ServiceContext;
use webapp_scaffold::error::{PortError, ScaffoldError};
use webapp_scaffold::naming::ProjectName;
use webapp_scaffold::ports::git::GitRepo;
use webapp_scaffold::ports::shell::{ShellExecutor, ShellOutput};
use webapp_scaffold::reporter::Reporter;
use webapp_scaffold::scaffold::initialize::SUMMARY_FILE;
use webapp_scaffold::scaffold::{self, ScaffoldReport, Stage};
use webapp_scaffold::template::ExclusionSet;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d];

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn write_template(root: &Path) {
    write(root, "README.md", b"# Starter Web App\n\nstarter-webapp\n");
    write(root, ".gitignore", b"node_modules/\n");
    write(root, "package.json", b"{\"name\": \"starter-webapp\"}\n");
    write(root, "backend/requirements.txt", b"fastapi\n");
    write(root, "backend/.env.example", b"DB=starter_webapp.db\n");
    write(root, "backend/app/main.py", b"title = 'Starter Web App'\n");
    write(root, "backend/app/__pycache__/main.pyc", &[0, 1, 2, 3]);
    write(root, "backend/venv/bin/python", b"#!/bin/sh\n");
    write(root, "backend/app.db", b"SQLite format 3\0");
    write(
        root,
        "frontend/package.json",
        b"{\"name\": \"starter-webapp-frontend\"}\n",
    );
    write(root, "frontend/node_modules/react/index.js", b"x");
    write(root, "frontend/dist/index.html", b"<html></html>\n");
    write(root, "frontend/public/logo.png", PNG);
    write(
        root,
        "frontend/src/App.jsx",
        b"export default function App() { return 'Starter Web App' }\n",
    );
    write(root, ".git/HEAD", b"ref: refs/heads/main\n");
}

fn relative_files(root: &Path) -> BTreeSet<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect()
}

fn options(source: &Path, target: &Path, name: &str) -> ScaffoldOptions {
    let mut options = ScaffoldOptions::new(ProjectName::parse(name).unwrap(), source);
    options.target = target.to_path_buf();
    options.steps = StepToggles::none();
    options
}

fn live() -> ServiceContext {
    ServiceContext::live(DEFAULT_TIMEOUT)
}

fn generate(source: &Path, target: &Path, name: &str) -> ScaffoldReport {
    let opts = options(source, target, name);
    scaffold::run(&live(), &opts, &Reporter::buffered()).unwrap()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn target_paths_equal_source_paths_minus_exclusions() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("template");
    let target = dir.path().join("blog-platform");
    write_template(&source);

    generate(&source, &target, "blog-platform");

    let exclusions = ExclusionSet::with_extra::<&str>(&[]).unwrap();
    let expected: BTreeSet<PathBuf> = relative_files(&source)
        .into_iter()
        .filter(|p| !exclusions.is_excluded(p))
        .collect();
    assert_eq!(relative_files(&target), expected);
    assert!(expected.contains(Path::new(".gitignore")));
    let node_modules = Path::new("frontend/node_modules");
    assert!(!expected.iter().any(|p| p.starts_with(node_modules)));
}

#[test]
fn names_are_replaced_without_residue() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("template");
    let target = dir.path().join("blog-platform");
    write_template(&source);

    generate(&source, &target, "blog-platform");

    for file in relative_files(&target) {
        let Ok(text) = fs::read_to_string(target.join(&file)) else {
            continue;
        };
        for residue in ["starter-webapp", "starter_webapp", "Starter Web App"] {
            assert!(
                !text.contains(residue),
                "{residue} left in {}",
                file.display()
            );
        }
    }
    assert_eq!(
        read(&target.join("frontend/package.json")),
        "{\"name\": \"blog-platform-frontend\"}\n"
    );
    assert_eq!(
        read(&target.join("backend/.env.example")),
        "DB=blog_platform.db\n"
    );
}

#[test]
fn binary_files_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("template");
    let target = dir.path().join("out");
    write_template(&source);

    generate(&source, &target, "blog-platform");

    let logo = fs::read(target.join("frontend/public/logo.png")).unwrap();
    assert_eq!(logo, PNG);
}

#[test]
fn same_name_reproduces_template() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("template");
    let target = dir.path().join("copy");
    write_template(&source);

    let report = generate(&source, &target, "starter-webapp");

    assert_eq!(report.files_changed, 0);
    for file in relative_files(&target) {
        assert_eq!(
            fs::read(target.join(&file)).unwrap(),
            fs::read(source.join(&file)).unwrap()
        );
    }
}

#[test]
fn second_run_conflicts_and_leaves_first_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("template");
    let target = dir.path().join("blog");
    write_template(&source);
    let opts = options(&source, &target, "blog");

    scaffold::run(&live(), &opts, &Reporter::buffered()).unwrap();
    fs::write(target.join("README.md"), "my notes\n").unwrap();
    let before = relative_files(&target);

    let err = scaffold::run(&live(), &opts, &Reporter::buffered()).unwrap_err();

    assert_eq!(err.stage, Stage::Materializing);
    assert!(matches!(err.source, ScaffoldError::TargetConflict { .. }));
    assert_eq!(read(&target.join("README.md")), "my notes\n");
    assert_eq!(relative_files(&target), before);
}

#[test]
fn target_inside_template_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("template");
    write_template(&source);

    for target in [source.join("blog"), source.join("apps/blog"), source.clone()] {
        let mut opts = options(&source, &target, "blog");
        opts.overwrite = true;

        let err = scaffold::run(&live(), &opts, &Reporter::buffered()).unwrap_err();

        assert_eq!(err.stage, Stage::Collecting);
        assert!(matches!(
            err.source,
            ScaffoldError::TargetInsideSource { .. }
        ));
    }
    assert!(!source.join("blog").exists());
    assert!(!source.join("apps").exists());
}

#[test]
fn default_targets_never_nest_earlier_projects() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("template");
    write_template(&source);

    for name in ["blog", "shop"] {
        let mut opts = ScaffoldOptions::new(ProjectName::parse(name).unwrap(), &source);
        opts.steps = StepToggles::none();
        scaffold::run(&live(), &opts, &Reporter::buffered()).unwrap();
    }

    assert!(dir.path().join("blog/README.md").exists());
    assert!(dir.path().join("shop/README.md").exists());
    assert!(!dir.path().join("shop/blog").exists());
    assert!(!source.join("blog").exists());
    assert_eq!(
        relative_files(&dir.path().join("blog")),
        relative_files(&dir.path().join("shop"))
    );
}

#[test]
fn readme_and_summary_carry_the_same_description() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("template");
    write_template(&source);
    write(
        &source,
        "README.md",
        b"# Starter Web App\n\nFull-stack template with FastAPI + React\n",
    );

    for (name, description) in [("blog", None), ("shop", Some("An online store"))] {
        let target = dir.path().join(name);
        let mut opts = options(&source, &target, name);
        opts.description = description.map(str::to_string);
        opts.steps = StepToggles {
            summary: true,
            ..StepToggles::none()
        };

        scaffold::run(&live(), &opts, &Reporter::buffered()).unwrap();

        let expected = description.unwrap_or(DEFAULT_DESCRIPTION);
        let readme = read(&target.join("README.md"));
        let summary = read(&target.join(SUMMARY_FILE));
        assert!(readme.contains(expected), "{readme}");
        assert!(!readme.contains("Full-stack template"));
        assert!(summary.contains(expected), "{summary}");
    }
}

#[cfg(unix)]
#[test]
fn permissions_are_preserved() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("template");
    let target = dir.path().join("out");
    write_template(&source);
    write(&source, "scripts/dev.sh", b"echo starter-webapp\n");
    let executable = fs::Permissions::from_mode(0o755);
    fs::set_permissions(source.join("scripts/dev.sh"), executable).unwrap();

    generate(&source, &target, "blog");

    let metadata = fs::metadata(target.join("scripts/dev.sh")).unwrap();
    assert_eq!(metadata.permissions().mode() & 0o777, 0o755);
    assert_eq!(read(&target.join("scripts/dev.sh")), "echo blog\n");
}

struct FailingShell;

impl ShellExecutor for FailingShell {
    fn run(
        &self,
        command: &str,
        _cwd: &Path,
        _timeout: Duration,
    ) -> Result<ShellOutput, PortError> {
        Ok(ShellOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: format!("{command}: not found"),
        })
    }
}

struct NoGit;

impl GitRepo for NoGit {
    fn init(&self, _dir: &Path) -> Result<(), PortError> {
        Err("git is not installed".into())
    }

    fn add_all(&self, _dir: &Path) -> Result<(), PortError> {
        Err("git is not installed".into())
    }

    fn commit(&self, _dir: &Path, _message: &str) -> Result<String, PortError> {
        Err("git is not installed".into())
    }
}

#[test]
fn failing_installers_still_succeed_with_full_tree() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("template");
    let target = dir.path().join("blog");
    write_template(&source);
    let ctx = ServiceContext::new(
        Box::new(LiveFileSystem),
        Box::new(FailingShell),
        Box::new(NoGit),
        Box::new(LiveClock),
    );
    let mut opts = options(&source, &target, "blog");
    opts.steps = StepToggles::all();

    let report = scaffold::run(&ctx, &opts, &Reporter::buffered()).unwrap();

    assert_eq!(report.stage, Stage::Done);
    let steps: Vec<&str> = report.warnings.iter().map(|w| w.step.as_str()).collect();
    assert_eq!(steps, vec!["git", "install:backend", "install:frontend"]);
    assert!(target.join("frontend/src/App.jsx").exists());
    assert!(target.join("backend/.env").exists());
    assert!(target.join("PROJECT_SUMMARY.md").exists());
}
