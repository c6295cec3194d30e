use crate::config::CatalogTables;
use crate::error::Error;
use diesel::prelude::*;
use diesel::query_builder::SqlQuery;
use diesel::query_dsl::LoadQuery;
use diesel::sql_types::Text;
use std::collections::HashSet;

/// Image paths the catalog considers in use. Empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    paths: HashSet<String>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false for empty values and for paths already present.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if path.is_empty() {
            return false;
        }
        self.paths.insert(path)
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.paths.contains(relative_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|s| s.as_str())
    }
}

impl<S: Into<String>> FromIterator<S> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ReferenceSet::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}

#[derive(Debug, QueryableByName)]
pub(crate) struct ImageRow {
    #[diesel(sql_type = Text)]
    pub image: String,
}

pub(crate) fn reference_query(tables: &CatalogTables) -> String {
    format!(
        "SELECT image FROM {} WHERE image IS NOT NULL AND image <> '' \
         UNION \
         SELECT image FROM {} WHERE image IS NOT NULL AND image <> ''",
        tables.product, tables.product_image
    )
}

/// Runs the single union query against any diesel backend.
pub(crate) fn load_reference_set<C>(
    conn: &mut C,
    tables: &CatalogTables,
) -> Result<ReferenceSet, Error>
where
    C: Connection,
    SqlQuery: LoadQuery<'static, C, ImageRow>,
{
    let rows: Vec<ImageRow> = diesel::sql_query(reference_query(tables)).load(conn)?;
    Ok(rows.into_iter().map(|row| row.image).collect())
}
