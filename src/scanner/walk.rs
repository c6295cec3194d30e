use super::{is_image, ExcludeSet};
use crate::error::ScanError;
use crate::paths::ScanRoot;
use crate::progress::ProgressReporter;
use crate::report::OrphanRecord;
use crate::storage::ReferenceSet;
use std::time::Instant;
use tracing::debug;
use walkdir::{IntoIter, WalkDir};

const PROGRESS_INTERVAL: usize = 256;

/// Lazy orphan search over one scan root.
///
/// Yields orphans as they are found. The first traversal error is yielded once and ends
/// the iteration. Symlinks are neither followed nor reported. Hidden files are visited
/// like any other; use exclude patterns to keep a tree out of the scan.
pub struct OrphanScan<'a> {
    walker: IntoIter,
    root: &'a ScanRoot,
    references: &'a ReferenceSet,
    excludes: &'a ExcludeSet,
    files_seen: usize,
    failed: bool,
}

pub fn scan_iter<'a>(
    root: &'a ScanRoot,
    references: &'a ReferenceSet,
    excludes: &'a ExcludeSet,
) -> OrphanScan<'a> {
    let walker = WalkDir::new(&root.dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    OrphanScan {
        walker,
        root,
        references,
        excludes,
        files_seen: 0,
        failed: false,
    }
}

impl OrphanScan<'_> {
    /// Image files visited so far, orphaned or not.
    pub fn files_seen(&self) -> usize {
        self.files_seen
    }
}

impl Iterator for OrphanScan<'_> {
    type Item = Result<OrphanRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(ScanError::Walk(err)));
                }
            };

            if !entry.file_type().is_file() || !is_image(entry.path()) {
                continue;
            }
            self.files_seen += 1;

            // walkdir only yields paths below `dir`, which is below `base`.
            let Some(relative_path) = self.root.relative_key(entry.path()) else {
                continue;
            };
            if self.excludes.is_excluded(&relative_path)
                || self.references.contains(&relative_path)
            {
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(err) => {
                    self.failed = true;
                    return Some(Err(ScanError::Metadata {
                        path: entry.path().to_path_buf(),
                        source: err.into(),
                    }));
                }
            };

            return Some(Ok(OrphanRecord {
                path: entry.into_path(),
                relative_path,
                size,
            }));
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanOutput {
    pub orphans: Vec<OrphanRecord>,
    pub files_scanned: usize,
}

/// Runs a whole scan. Any traversal error aborts it; a truncated list is never returned.
pub fn scan(
    root: &ScanRoot,
    references: &ReferenceSet,
    excludes: &ExcludeSet,
    reporter: &dyn ProgressReporter,
) -> Result<ScanOutput, ScanError> {
    let start = Instant::now();
    reporter.on_scan_start(&root.dir.to_string_lossy());

    let mut iter = scan_iter(root, references, excludes);
    let mut orphans = Vec::new();
    let mut last_reported = 0;

    while let Some(record) = iter.next() {
        orphans.push(record?);
        if iter.files_seen() - last_reported >= PROGRESS_INTERVAL {
            last_reported = iter.files_seen();
            reporter.on_scan_progress(last_reported, orphans.len());
        }
    }

    let files_scanned = iter.files_seen();
    let duration = start.elapsed();
    reporter.on_scan_complete(orphans.len(), duration.as_secs_f64());
    debug!(
        "Scan of {} completed in {:.2}s: {} images, {} orphans",
        root.dir.display(),
        duration.as_secs_f64(),
        files_scanned,
        orphans.len(),
    );

    Ok(ScanOutput {
        orphans,
        files_scanned,
    })
}
