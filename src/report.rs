use crate::deletion::{DeletionOutcome, DeletionResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An image file no catalog row references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanRecord {
    /// Resolved absolute path; the identity of the record.
    pub path: PathBuf,
    /// Path relative to the normalization base, as the catalog would store it.
    pub relative_path: String,
    pub size: u64,
}

/// Result of one dry run or delete, handed to whatever presents it.
///
/// A report that exists always describes a completed operation: failures of the reference
/// query, root validation or the scan surface as errors instead of an empty report.
/// `errors` only ever holds per-file deletion failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub scan_root: PathBuf,
    pub reference_count: usize,
    pub files_scanned: usize,
    pub orphans: Vec<OrphanRecord>,
    pub requested: usize,
    pub deleted: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl Report {
    pub fn new(scan_root: PathBuf, reference_count: usize) -> Self {
        Self {
            scan_root,
            reference_count,
            ..Default::default()
        }
    }

    pub fn orphan_count(&self) -> usize {
        self.orphans.len()
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    pub fn failed_count(&self) -> usize {
        self.errors.len()
    }

    pub fn reclaimable_bytes(&self) -> u64 {
        self.orphans.iter().map(|o| o.size).sum()
    }

    pub fn orphan_paths(&self) -> Vec<PathBuf> {
        self.orphans.iter().map(|o| o.path.clone()).collect()
    }

    /// Appends deletion outcomes in the order they were attempted.
    pub fn record_deletions(&mut self, results: Vec<DeletionResult>) {
        self.requested += results.len();
        for result in results {
            match result.outcome {
                DeletionOutcome::Deleted => self.deleted.push(result.path),
                DeletionOutcome::Failed(err) => self
                    .errors
                    .push(format!("Failed to delete {}: {}", result.path.display(), err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deletion::DeletionError;

    fn orphan(path: &str, size: u64) -> OrphanRecord {
        OrphanRecord {
            path: PathBuf::from(path),
            relative_path: path.trim_start_matches("/srv/image/").to_string(),
            size,
        }
    }

    #[test]
    fn test_counts_and_bytes() {
        let mut report = Report::new(PathBuf::from("/srv/image"), 3);
        report.orphans = vec![orphan("/srv/image/a.jpg", 100), orphan("/srv/image/b.png", 23)];
        assert_eq!(report.orphan_count(), 2);
        assert_eq!(report.reclaimable_bytes(), 123);
        assert_eq!(
            report.orphan_paths(),
            vec![PathBuf::from("/srv/image/a.jpg"), PathBuf::from("/srv/image/b.png")]
        );
    }

    #[test]
    fn test_record_deletions_keeps_order() {
        let mut report = Report::new(PathBuf::from("/srv/image"), 0);
        report.record_deletions(vec![
            DeletionResult {
                path: PathBuf::from("/srv/image/a.jpg"),
                outcome: DeletionOutcome::Deleted,
            },
            DeletionResult {
                path: PathBuf::from("/srv/image/b.jpg"),
                outcome: DeletionOutcome::Failed(DeletionError::NotFound),
            },
            DeletionResult {
                path: PathBuf::from("/srv/image/c.jpg"),
                outcome: DeletionOutcome::Failed(DeletionError::Referenced),
            },
        ]);

        assert_eq!(report.requested, 3);
        assert_eq!(report.deleted_count(), 1);
        assert_eq!(report.failed_count(), 2);
        assert!(report.errors[0].contains("b.jpg"));
        assert!(report.errors[0].contains("not found"));
        assert!(report.errors[1].contains("c.jpg"));
    }

    #[test]
    fn test_report_json_keeps_orphan_paths() {
        let mut report = Report::new(PathBuf::from("/srv/image"), 1);
        report.orphans = vec![orphan("/srv/image/catalog/b.png", 5)];
        let json = serde_json::to_string(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.orphan_paths(), report.orphan_paths());
        assert_eq!(parsed.orphans[0].relative_path, "catalog/b.png");
    }
}
