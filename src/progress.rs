/// Trait for reporting progress of a dry run or a delete.
///
/// The CLI implements it with indicatif spinners. All methods have default no-op
/// implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_references_start(&self) {}
    fn on_references_complete(&self, _count: usize, _duration_secs: f64) {}
    fn on_scan_start(&self, _dir: &str) {}
    fn on_scan_progress(&self, _files_seen: usize, _orphans_found: usize) {}
    fn on_scan_complete(&self, _orphans_found: usize, _duration_secs: f64) {}
    fn on_delete_start(&self, _total: usize) {}
    fn on_delete_progress(&self, _processed: usize, _total: usize) {}
    fn on_delete_complete(&self, _deleted: usize, _failed: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
