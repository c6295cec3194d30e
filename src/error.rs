use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Database connection error: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("Invalid directory: {0}")]
    InvalidRoot(String),

    #[error("Directory scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("No confirmed files to delete")]
    NothingToDelete,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Both query and connection failures mean the reference set is unavailable.
    pub fn is_database(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Connection(_))
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

/// A traversal failure. Aborts the scan; no partial orphan list is returned.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("{}", describe_walk_error(.0))]
    Walk(#[from] walkdir::Error),

    #[error("Error getting metadata for {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn describe_walk_error(err: &walkdir::Error) -> String {
    match err.path() {
        Some(path) => format!("Error reading {}: {}", path.display(), err),
        None => err.to_string(),
    }
}
