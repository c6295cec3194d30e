//! Finds product images on disk that no catalog row references, and deletes them on
//! request.
//!
//! A dry run loads the set of image paths used by the `product` and `product_image`
//! tables, walks a validated directory and reports every image file whose path relative
//! to the image root is not in that set. A delete takes the confirmed list back, checks
//! every entry again against the filesystem and a freshly loaded reference set, and
//! removes what is still orphaned.

pub mod config;
pub mod deletion;
pub mod engine;
pub mod error;
pub mod paths;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod storage;

pub use config::{AppConfig, RootPolicy};
pub use engine::{CleanupEngine, DeleteCommand, DryRunCommand};
pub use error::{Error, ScanError};
pub use progress::{ProgressReporter, SilentReporter};
pub use report::{OrphanRecord, Report};
pub use storage::{Catalog, ReferenceSet};
