//! Template manifest and per-invocation options.
//!
//! A template may describe itself in a `scaffold.yaml` at its root. Without
//! one, the defaults describe the `starter-webapp` template:
//!
//! ```yaml
//! name: starter-webapp
//! title: Starter Web App
//! description: Full-stack template with FastAPI + React
//! exclude: ["*.log"]
//! installers:
//!   - name: frontend
//!     dir: frontend
//!     marker: package.json
//!     commands: ["npm install"]
//! ```

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::ServiceContext;
use crate::error::ScaffoldError;
use crate::naming::{NameStyle, NameVariantSet, ProjectName};

/// File name of the template manifest.
pub const MANIFEST_FILE: &str = "scaffold.yaml";

/// Description used when the user supplies none.
pub const DEFAULT_DESCRIPTION: &str = "A full-stack web application built with FastAPI and React";

/// Default subprocess timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// A dependency installer run inside one subdirectory of the generated project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installer {
    /// Short name used in progress output and warnings.
    pub name: String,
    /// Subdirectory the commands run in.
    pub dir: PathBuf,
    /// File that must exist in `dir` for the installer to run.
    pub marker: String,
    /// Shell commands, run in order; the first failure stops the installer.
    pub commands: Vec<String>,
}

/// Self-description of a template directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateManifest {
    /// The template's own project name (kebab-case).
    pub name: String,
    /// Explicit Title Case spelling of the template name.
    pub title: Option<String>,
    /// Explicit PascalCase spelling of the template name.
    pub pascal: Option<String>,
    /// Description text to replace with the user's description.
    pub description: Option<String>,
    /// Patterns excluded in addition to the built-in exclusion set.
    pub exclude: Vec<String>,
    /// Dependency installers.
    pub installers: Vec<Installer>,
}

impl Default for TemplateManifest {
    fn default() -> Self {
        Self {
            name: "starter-webapp".to_string(),
            title: Some("Starter Web App".to_string()),
            pascal: None,
            description: Some("Full-stack template with FastAPI + React".to_string()),
            exclude: Vec::new(),
            installers: default_installers(),
        }
    }
}

#[cfg(windows)]
fn backend_commands() -> Vec<String> {
    vec![
        "python -m venv venv".to_string(),
        r"venv\Scripts\python -m pip install --upgrade pip".to_string(),
        r"venv\Scripts\python -m pip install -r requirements.txt".to_string(),
    ]
}

#[cfg(not(windows))]
fn backend_commands() -> Vec<String> {
    vec![
        "python3 -m venv venv".to_string(),
        "venv/bin/python -m pip install --upgrade pip".to_string(),
        "venv/bin/python -m pip install -r requirements.txt".to_string(),
    ]
}

fn default_installers() -> Vec<Installer> {
    vec![
        Installer {
            name: "backend".to_string(),
            dir: PathBuf::from("backend"),
            marker: "requirements.txt".to_string(),
            commands: backend_commands(),
        },
        Installer {
            name: "frontend".to_string(),
            dir: PathBuf::from("frontend"),
            marker: "package.json".to_string(),
            commands: vec!["npm install".to_string()],
        },
    ]
}

impl TemplateManifest {
    /// Loads `scaffold.yaml` from `root`, falling back to the defaults when
    /// the file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Manifest`] if the file exists but cannot be
    /// read or parsed, or names an invalid template name.
    pub fn load(ctx: &ServiceContext, root: &Path) -> Result<Self, ScaffoldError> {
        let path = root.join(MANIFEST_FILE);
        if !ctx.fs.exists(&path) {
            tracing::debug!(path = %path.display(), "no template manifest, using defaults");
            return Ok(Self::default());
        }
        let manifest_err = |message: String| ScaffoldError::Manifest {
            path: path.clone(),
            message,
        };
        let text = ctx
            .fs
            .read_to_string(&path)
            .map_err(|e| manifest_err(e.to_string()))?;
        let manifest: Self = serde_yaml::from_str(&text)
            .map_err(|e| manifest_err(e.to_string()))?;
        ProjectName::strict(&manifest.name)
            .map_err(|e| manifest_err(e.to_string()))?;
        tracing::debug!(name = %manifest.name, "loaded template manifest");
        Ok(manifest)
    }

    /// The template's name variants, with manifest overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::InvalidName`] if `name` is not a valid
    /// project name.
    pub fn variants(&self) -> Result<NameVariantSet, ScaffoldError> {
        let name = ProjectName::strict(&self.name)?;
        let mut set = NameVariantSet::derive(&name);
        if let Some(title) = &self.title {
            set = set.with_override(NameStyle::Title, title.clone());
        }
        if let Some(pascal) = &self.pascal {
            set = set.with_override(NameStyle::Pascal, pascal.clone());
        }
        Ok(set)
    }
}

/// Which post-generation steps run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct StepToggles {
    /// Copy `.env.example` files to `.env`.
    pub env_files: bool,
    /// Initialize git and create the first commit.
    pub git: bool,
    /// Run dependency installers.
    pub install: bool,
    /// Write `PROJECT_SUMMARY.md`.
    pub summary: bool,
}

impl StepToggles {
    /// Every step enabled.
    #[must_use]
    pub fn all() -> Self {
        Self {
            env_files: true,
            git: true,
            install: true,
            summary: true,
        }
    }

    /// Every step disabled.
    #[must_use]
    pub fn none() -> Self {
        Self {
            env_files: false,
            git: false,
            install: false,
            summary: false,
        }
    }
}

/// Everything one scaffold invocation needs.
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Validated name of the new project.
    pub name: ProjectName,
    /// Description of the new project, if the user gave one.
    pub description: Option<String>,
    /// Template root to copy from.
    pub source: PathBuf,
    /// Directory to generate into.
    pub target: PathBuf,
    /// Write into a non-empty target.
    pub overwrite: bool,
    /// Stop after planning.
    pub dry_run: bool,
    /// Post-generation steps to run.
    pub steps: StepToggles,
    /// Subprocess timeout.
    pub timeout: Duration,
}

impl ScaffoldOptions {
    /// Options with defaults: the target is `<name>` next to the template
    /// root, all steps are enabled.
    #[must_use]
    pub fn new(name: ProjectName, source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let target = absolute(&source)
            .and_then(|root| Some(root.parent()?.join(name.as_str())))
            .unwrap_or_else(|| PathBuf::from(".").join(name.as_str()));
        Self {
            name,
            description: None,
            source,
            target,
            overwrite: false,
            dry_run: false,
            steps: StepToggles::all(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// `target` relative to `source` when it is `source` itself or lies
/// inside it. Both paths are resolved lexically against the working
/// directory; symlinks are not followed.
#[must_use]
pub fn target_within(source: &Path, target: &Path) -> Option<PathBuf> {
    let source = absolute(source)?;
    let target = absolute(target)?;
    target.strip_prefix(&source).ok().map(Path::to_path_buf)
}

fn absolute(path: &Path) -> Option<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    Some(out)
}
