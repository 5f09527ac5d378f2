//! The write plan: what the materializer will produce, computed without
//! touching the target.

use std::path::{Path, PathBuf};

use crate::template::TemplateFile;

/// One file the materializer will write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Path relative to the target root.
    pub relative_path: PathBuf,
    /// Contents after substitution.
    pub contents: Vec<u8>,
    /// Permission bits to apply.
    pub mode: Option<u32>,
    /// Whether the file is copied as opaque bytes.
    pub binary: bool,
    /// Whether substitution changed the contents.
    pub substituted: bool,
}

/// Every file to write, in template order, plus the target root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPlan {
    /// Directory the project is generated into.
    pub target: PathBuf,
    /// Files to write.
    pub files: Vec<PlannedFile>,
}

impl ScaffoldPlan {
    /// Absolute (or target-relative) destination of a planned file.
    #[must_use]
    pub fn destination(&self, file: &PlannedFile) -> PathBuf {
        self.target.join(&file.relative_path)
    }

    /// Number of files whose contents were rewritten.
    #[must_use]
    pub fn substituted_count(&self) -> usize {
        self.files.iter().filter(|f| f.substituted).count()
    }
}

/// Plans the output for already-substituted files.
#[must_use]
pub fn plan_scaffold(target: &Path, files: Vec<(TemplateFile, bool)>) -> ScaffoldPlan {
    let files = files
        .into_iter()
        .map(|(file, substituted)| PlannedFile {
            relative_path: file.relative_path,
            contents: file.contents,
            mode: file.mode,
            binary: file.binary,
            substituted,
        })
        .collect();
    ScaffoldPlan {
        target: target.to_path_buf(),
        files,
    }
}

/// Formats a plan as a human-readable report.
#[must_use]
pub fn format_plan(plan: &ScaffoldPlan) -> String {
    if plan.files.is_empty() {
        return format!("No files to write into {}.", plan.target.display());
    }

    let mut lines = vec![format!(
        "Would write {} file(s) into {} ({} rewritten):",
        plan.files.len(),
        plan.target.display(),
        plan.substituted_count()
    )];
    for file in &plan.files {
        let action = if file.substituted { "REWRITE" } else { "COPY" };
        let kind = if file.binary { " (binary)" } else { "" };
        let path = file.relative_path.display();
        lines.push(format!("  {action:<7} {path}{kind}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_file(path: &str, contents: &[u8]) -> TemplateFile {
        TemplateFile::new(path, contents.to_vec(), Some(0o644))
    }

    #[test]
    fn plan_keeps_order_and_attributes() {
        let plan = plan_scaffold(
            Path::new("/out/blog"),
            vec![
                (template_file("README.md", b"# Blog Platform"), true),
                (template_file("logo.png", &[0, 1, 2]), false),
            ],
        );

        assert_eq!(plan.files.len(), 2);
        assert_eq!(
            plan.destination(&plan.files[0]),
            PathBuf::from("/out/blog/README.md")
        );
        assert!(plan.files[1].binary);
        assert_eq!(plan.files[1].mode, Some(0o644));
        assert_eq!(plan.substituted_count(), 1);
    }

    #[test]
    fn format_plan_marks_rewrites_and_binaries() {
        let plan = plan_scaffold(
            Path::new("blog"),
            vec![
                (template_file("README.md", b"x"), true),
                (template_file("logo.png", &[0]), false),
                (template_file("LICENSE", b"MIT"), false),
            ],
        );

        assert_eq!(
            format_plan(&plan),
            "Would write 3 file(s) into blog (1 rewritten):\n\
             \x20 REWRITE README.md\n\
             \x20 COPY    logo.png (binary)\n\
             \x20 COPY    LICENSE"
        );
    }

    #[test]
    fn format_empty_plan() {
        let plan = plan_scaffold(Path::new("blog"), Vec::new());
        assert_eq!(format_plan(&plan), "No files to write into blog.");
    }
}
