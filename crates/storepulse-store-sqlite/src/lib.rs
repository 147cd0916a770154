//! SQLite storage for single-node StorePulse deployments
//!
//! One database file holds both halves of the engine's state: the five
//! append-only event collections and the product catalog. The two store
//! traits are implemented by separate handles over a shared connection
//! pool, so the server can wire them independently.
//!
//! # Example
//! ```no_run
//! # use storepulse_store_sqlite::{SqliteCatalogStore, SqliteEventStore, connect};
//! # async fn example() -> storepulse_core::Result<()> {
//! let pool = connect("~/.storepulse/storepulse.db").await?;
//! let events = SqliteEventStore::new(pool.clone());
//! let catalog = SqliteCatalogStore::new(pool);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

use storepulse_core::{Error, Result};

mod catalog_store;
mod event_store;
mod schema;

pub use catalog_store::SqliteCatalogStore;
pub use event_store::SqliteEventStore;

/// Open (creating if missing) the database at `db_path` and prepare it.
///
/// Creates parent directories, applies the schema, and verifies the schema
/// version. A leading `~` in the path expands to the home directory.
///
/// # Errors
/// - `Error::Io` if the parent directory cannot be created
/// - `Error::Database` if the connection fails or the schema version is
///   unsupported
pub async fn connect(db_path: impl Into<PathBuf>) -> Result<SqlitePool> {
    let db_path = expand_tilde(db_path.into())?;

    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(Error::Io)?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(&db_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
        )
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

    schema::initialize(&pool).await?;

    let version: i32 = sqlx::query_scalar("SELECT version FROM schema_version")
        .fetch_one(&pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

    if version != 1 {
        return Err(Error::Database(format!(
            "Unsupported schema version: {}",
            version
        )));
    }

    tracing::debug!("Opened analytics database at {}", db_path.display());

    Ok(pool)
}

pub(crate) fn db_err(e: sqlx::Error) -> Error {
    Error::Database(e.to_string())
}

/// Expand tilde (~) in path
fn expand_tilde(path: PathBuf) -> Result<PathBuf> {
    if path.starts_with("~") {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Internal("Could not determine home directory".to_string()))?;
        Ok(home.join(path.strip_prefix("~").unwrap()))
    } else {
        Ok(path)
    }
}
