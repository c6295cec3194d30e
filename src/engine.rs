use crate::config::{AppConfig, CatalogTables};
use crate::deletion;
use crate::error::Error;
use crate::paths::{self, ScanRoot};
use crate::progress::ProgressReporter;
use crate::report::Report;
use crate::scanner::{self, ExcludeSet};
use crate::storage::{Catalog, ReferenceSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Report what would be deleted under `directory` (the image root when `None`).
#[derive(Debug, Clone, Default)]
pub struct DryRunCommand {
    pub directory: Option<String>,
}

/// Delete `confirmed_paths`, which normally come from a dry run over the same
/// `directory`. Each path is re-validated before it is removed.
#[derive(Debug, Clone, Default)]
pub struct DeleteCommand {
    pub directory: Option<String>,
    pub confirmed_paths: Vec<PathBuf>,
}

pub struct CleanupEngine {
    config: AppConfig,
    tables: CatalogTables,
    excludes: ExcludeSet,
}

impl CleanupEngine {
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let tables = config.tables()?;
        let excludes = ExcludeSet::new(&config.exclude_patterns)?;
        Ok(Self {
            config,
            tables,
            excludes,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn image_root(&self) -> &Path {
        Path::new(&self.config.image_root)
    }

    pub fn resolve_root(&self, directory: Option<&str>) -> Result<ScanRoot, Error> {
        paths::validate_root(directory, self.image_root(), self.config.root_policy)
    }

    /// Validate the root, load the reference set, then scan. Each step aborts on failure,
    /// so a returned report is always complete.
    pub fn run_dry_run(
        &self,
        catalog: &mut Catalog,
        command: &DryRunCommand,
        reporter: &dyn ProgressReporter,
    ) -> Result<Report, Error> {
        let root = self.resolve_root(command.directory.as_deref())?;
        info!("Dry run over {}", root.dir.display());

        let references = self.load_references(catalog, reporter)?;

        let output = scanner::scan(&root, &references, &self.excludes, reporter)?;
        info!(
            "{} orphaned images out of {} scanned",
            output.orphans.len(),
            output.files_scanned
        );

        let mut report = Report::new(root.dir, references.len());
        report.files_scanned = output.files_scanned;
        report.orphans = output.orphans;
        Ok(report)
    }

    /// Validate the root, reload the reference set, then delete what is still orphaned.
    /// Nothing is deleted if either of the first two steps fails.
    pub fn run_delete(
        &self,
        catalog: &mut Catalog,
        command: &DeleteCommand,
        reporter: &dyn ProgressReporter,
    ) -> Result<Report, Error> {
        if command.confirmed_paths.is_empty() {
            return Err(Error::NothingToDelete);
        }

        let root = self.resolve_root(command.directory.as_deref())?;
        info!(
            "Deleting {} files under {}",
            command.confirmed_paths.len(),
            root.dir.display()
        );

        let references = self.load_references(catalog, reporter)?;

        let results = deletion::delete_all(
            &root,
            &references,
            &self.excludes,
            &command.confirmed_paths,
            reporter,
        );

        let mut report = Report::new(root.dir, references.len());
        report.record_deletions(results);
        Ok(report)
    }

    fn load_references(
        &self,
        catalog: &mut Catalog,
        reporter: &dyn ProgressReporter,
    ) -> Result<ReferenceSet, Error> {
        reporter.on_references_start();
        let start = Instant::now();
        let references = catalog.load_reference_set(&self.tables)?;
        let duration = start.elapsed();
        reporter.on_references_complete(references.len(), duration.as_secs_f64());
        debug!(
            "Loaded {} image references from {} and {} in {:.2}s",
            references.len(),
            self.tables.product,
            self.tables.product_image,
            duration.as_secs_f64(),
        );
        Ok(references)
    }
}
