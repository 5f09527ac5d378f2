//! Writing a plan into the target directory.

use std::path::Path;

use super::plan::ScaffoldPlan;
use crate::context::ServiceContext;
use crate::error::ScaffoldError;

/// Fails if `target` holds anything, unless `overwrite` is set.
///
/// # Errors
///
/// Returns [`ScaffoldError::TargetConflict`] if `target` is a file, or a
/// non-empty directory without `overwrite`.
pub fn check_target(
    ctx: &ServiceContext,
    target: &Path,
    overwrite: bool,
) -> Result<(), ScaffoldError> {
    if !ctx.fs.exists(target) {
        return Ok(());
    }
    if !ctx.fs.is_dir(target) {
        return Err(ScaffoldError::TargetConflict {
            path: target.to_path_buf(),
        });
    }
    let entries = ctx
        .fs
        .list_dir(target)
        .map_err(|source| ScaffoldError::ReadFailure {
            path: target.to_path_buf(),
            source,
        })?;
    if !entries.is_empty() && !overwrite {
        return Err(ScaffoldError::TargetConflict {
            path: target.to_path_buf(),
        });
    }
    if !entries.is_empty() {
        tracing::warn!(
            target = %target.display(),
            entries = entries.len(),
            "writing into non-empty target"
        );
    }
    Ok(())
}

/// Writes every planned file and returns how many were written.
///
/// The target check runs before the first write. Each file is written
/// atomically; the first failure stops the run and leaves the files written
/// so far in place.
///
/// # Errors
///
/// Returns [`ScaffoldError::TargetConflict`] from the target check, or
/// [`ScaffoldError::WriteFailure`] naming the file that could not be written.
pub fn materialize(
    ctx: &ServiceContext,
    plan: &ScaffoldPlan,
    overwrite: bool,
) -> Result<usize, ScaffoldError> {
    check_target(ctx, &plan.target, overwrite)?;
    ctx.fs
        .create_dir_all(&plan.target)
        .map_err(|source| ScaffoldError::WriteFailure {
            path: plan.target.clone(),
            source,
        })?;

    let mut written = 0;
    for file in &plan.files {
        let path = plan.destination(file);
        ctx.fs
            .write_atomic(&path, &file.contents, file.mode)
            .map_err(|source| ScaffoldError::WriteFailure {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), bytes = file.contents.len(), "wrote");
        written += 1;
    }
    Ok(written)
}
