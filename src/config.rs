use crate::error::Error;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_TABLE_PREFIX: &str = "oc_";

/// How a user-supplied directory is checked before it becomes a scan root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RootPolicy {
    /// The directory must resolve to the image root or somewhere beneath it.
    #[default]
    Contained,
    /// Any readable directory is accepted and becomes its own normalization base.
    Open,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub image_root: String,
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,
    #[serde(default)]
    pub root_policy: RootPolicy,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_table_prefix() -> String {
    DEFAULT_TABLE_PREFIX.to_string()
}

impl AppConfig {
    pub fn new(image_root: impl Into<String>) -> Self {
        Self {
            image_root: image_root.into(),
            table_prefix: default_table_prefix(),
            root_policy: RootPolicy::default(),
            exclude_patterns: Vec::new(),
            database_url: None,
        }
    }

    pub fn tables(&self) -> Result<CatalogTables, Error> {
        CatalogTables::with_prefix(&self.table_prefix)
    }

    /// The configured URL, or `DATABASE_URL` from the environment.
    pub fn database_url(&self) -> Result<String, Error> {
        match &self.database_url {
            Some(url) if !url.is_empty() => Ok(url.clone()),
            _ => env::var("DATABASE_URL")
                .map_err(|_| Error::Config("database_url or DATABASE_URL must be set".into())),
        }
    }
}

/// Loads `name` (any format the `config` crate understands, extension optional) and
/// `IMGSWEEP_*` environment overrides.
pub fn load_configuration(name: &str) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("table_prefix", DEFAULT_TABLE_PREFIX)?
        .add_source(ConfigFile::with_name(name).required(false))
        .add_source(Environment::with_prefix("IMGSWEEP"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// The two catalog tables holding image references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTables {
    pub product: String,
    pub product_image: String,
}

impl CatalogTables {
    pub fn with_prefix(prefix: &str) -> Result<Self, Error> {
        let tables = Self {
            product: format!("{}product", prefix),
            product_image: format!("{}product_image", prefix),
        };
        validate_identifier(&tables.product)?;
        validate_identifier(&tables.product_image)?;
        Ok(tables)
    }
}

// Table names are spliced into SQL text, so only plain identifiers get through.
fn validate_identifier(name: &str) -> Result<(), Error> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::Config(format!("invalid table name '{}'", name)))
    }
}
