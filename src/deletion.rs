use crate::paths::ScanRoot;
use crate::progress::ProgressReporter;
use crate::scanner::{is_image, ExcludeSet};
use crate::storage::ReferenceSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why one file was not removed. Never aborts the remaining deletions.
#[derive(Error, Debug)]
pub enum DeletionError {
    #[error("not found")]
    NotFound,

    #[error("not a regular file")]
    NotAFile,

    #[error("outside the scan root")]
    OutsideRoot,

    #[error("not an image file")]
    NotAnImage,

    #[error("excluded from scanning")]
    Excluded,

    #[error("referenced by the catalog")]
    Referenced,

    #[error("{0}")]
    Io(io::Error),
}

impl From<io::Error> for DeletionError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            DeletionError::NotFound
        } else {
            DeletionError::Io(err)
        }
    }
}

#[derive(Debug)]
pub enum DeletionOutcome {
    Deleted,
    Failed(DeletionError),
}

#[derive(Debug)]
pub struct DeletionResult {
    pub path: PathBuf,
    pub outcome: DeletionOutcome,
}

impl DeletionResult {
    pub fn is_deleted(&self) -> bool {
        matches!(self.outcome, DeletionOutcome::Deleted)
    }
}

/// Removes each path that is still an orphan under `root`.
///
/// `paths` is untrusted: every entry is checked again right before removal, against the
/// filesystem as it is now and against `references`, which should be freshly loaded.
pub fn delete_all(
    root: &ScanRoot,
    references: &ReferenceSet,
    excludes: &ExcludeSet,
    paths: &[PathBuf],
    reporter: &dyn ProgressReporter,
) -> Vec<DeletionResult> {
    let start = Instant::now();
    reporter.on_delete_start(paths.len());

    let mut results = Vec::with_capacity(paths.len());
    let mut deleted = 0;

    for (index, path) in paths.iter().enumerate() {
        let outcome = match delete_orphan(root, references, excludes, path) {
            Ok(resolved) => {
                debug!("Deleted {}", resolved.display());
                deleted += 1;
                DeletionOutcome::Deleted
            }
            Err(err) => {
                warn!("Failed to delete {}: {}", path.display(), err);
                DeletionOutcome::Failed(err)
            }
        };
        results.push(DeletionResult {
            path: path.clone(),
            outcome,
        });
        reporter.on_delete_progress(index + 1, paths.len());
    }

    let failed = results.len() - deleted;
    reporter.on_delete_complete(deleted, failed, start.elapsed().as_secs_f64());
    info!("Deletion finished: {} deleted, {} failed", deleted, failed);
    results
}

fn delete_orphan(
    root: &ScanRoot,
    references: &ReferenceSet,
    excludes: &ExcludeSet,
    path: &Path,
) -> Result<PathBuf, DeletionError> {
    let resolved = verify_orphan(root, references, excludes, path)?;
    fs::remove_file(&resolved)?;
    Ok(resolved)
}

/// Applies the scanner's rules to a single path and returns its resolved form.
fn verify_orphan(
    root: &ScanRoot,
    references: &ReferenceSet,
    excludes: &ExcludeSet,
    path: &Path,
) -> Result<PathBuf, DeletionError> {
    // The path itself must not be a symlink, whatever it points at.
    let metadata = fs::symlink_metadata(path)?;
    if !metadata.file_type().is_file() {
        return Err(DeletionError::NotAFile);
    }

    let resolved = fs::canonicalize(path)?;
    let relative_path = root
        .relative_key(&resolved)
        .ok_or(DeletionError::OutsideRoot)?;

    if !is_image(&resolved) {
        return Err(DeletionError::NotAnImage);
    }
    if excludes.is_excluded(&relative_path) {
        return Err(DeletionError::Excluded);
    }
    if references.contains(&relative_path) {
        return Err(DeletionError::Referenced);
    }
    Ok(resolved)
}
