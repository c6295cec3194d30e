use super::references::{self, ReferenceSet};
use crate::config::CatalogTables;
use crate::error::Error;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use tracing::debug;

#[cfg(not(any(feature = "sqlite", feature = "mysql", feature = "postgres")))]
compile_error!("enable at least one database backend feature: sqlite, mysql or postgres");

enum CatalogConnection {
    #[cfg(feature = "sqlite")]
    Sqlite(diesel::sqlite::SqliteConnection),
    #[cfg(feature = "mysql")]
    Mysql(diesel::mysql::MysqlConnection),
    #[cfg(feature = "postgres")]
    Postgres(diesel::pg::PgConnection),
}

/// A connection to the store database. Dropping it closes the connection.
pub struct Catalog {
    conn: CatalogConnection,
}

impl Catalog {
    /// Picks the backend from the URL scheme; anything without a known scheme is
    /// treated as a SQLite database file.
    pub fn open(database_url: &str) -> Result<Self, Error> {
        let scheme = database_url.split_once("://").map(|(scheme, _)| scheme);
        let conn = match scheme {
            Some("mysql") => Self::connect_mysql(database_url)?,
            Some("postgres") | Some("postgresql") => Self::connect_postgres(database_url)?,
            Some("sqlite") => Self::connect_sqlite(&database_url["sqlite://".len()..])?,
            Some(other) => {
                return Err(Error::Config(format!(
                    "unsupported database scheme '{}'",
                    other
                )))
            }
            None => Self::connect_sqlite(database_url)?,
        };
        debug!("Connected to catalog database");
        Ok(Catalog { conn })
    }

    #[cfg(feature = "sqlite")]
    pub fn open_in_memory() -> Result<Self, Error> {
        Ok(Catalog {
            conn: Self::connect_sqlite(":memory:")?,
        })
    }

    #[cfg(feature = "sqlite")]
    fn connect_sqlite(path: &str) -> Result<CatalogConnection, Error> {
        Ok(CatalogConnection::Sqlite(
            diesel::sqlite::SqliteConnection::establish(path)?,
        ))
    }

    #[cfg(not(feature = "sqlite"))]
    fn connect_sqlite(_path: &str) -> Result<CatalogConnection, Error> {
        Err(backend_disabled("sqlite"))
    }

    #[cfg(feature = "mysql")]
    fn connect_mysql(url: &str) -> Result<CatalogConnection, Error> {
        Ok(CatalogConnection::Mysql(
            diesel::mysql::MysqlConnection::establish(url)?,
        ))
    }

    #[cfg(not(feature = "mysql"))]
    fn connect_mysql(_url: &str) -> Result<CatalogConnection, Error> {
        Err(backend_disabled("mysql"))
    }

    #[cfg(feature = "postgres")]
    fn connect_postgres(url: &str) -> Result<CatalogConnection, Error> {
        Ok(CatalogConnection::Postgres(diesel::pg::PgConnection::establish(
            url,
        )?))
    }

    #[cfg(not(feature = "postgres"))]
    fn connect_postgres(_url: &str) -> Result<CatalogConnection, Error> {
        Err(backend_disabled("postgres"))
    }

    /// Runs raw SQL statements; used to prepare fixtures.
    pub fn batch_execute(&mut self, sql: &str) -> Result<(), Error> {
        match &mut self.conn {
            #[cfg(feature = "sqlite")]
            CatalogConnection::Sqlite(conn) => conn.batch_execute(sql)?,
            #[cfg(feature = "mysql")]
            CatalogConnection::Mysql(conn) => conn.batch_execute(sql)?,
            #[cfg(feature = "postgres")]
            CatalogConnection::Postgres(conn) => conn.batch_execute(sql)?,
        }
        Ok(())
    }

    /// Union of the non-empty `image` columns of both tables. Any failure is returned
    /// as is; a partial set is never produced.
    pub fn load_reference_set(&mut self, tables: &CatalogTables) -> Result<ReferenceSet, Error> {
        match &mut self.conn {
            #[cfg(feature = "sqlite")]
            CatalogConnection::Sqlite(conn) => references::load_reference_set(conn, tables),
            #[cfg(feature = "mysql")]
            CatalogConnection::Mysql(conn) => references::load_reference_set(conn, tables),
            #[cfg(feature = "postgres")]
            CatalogConnection::Postgres(conn) => references::load_reference_set(conn, tables),
        }
    }
}

#[allow(dead_code)]
fn backend_disabled(name: &str) -> Error {
    Error::Config(format!(
        "this build does not include the {} backend (enable the '{}' feature)",
        name, name
    ))
}
