//! SQLite storage bootstrap, schema migrations and connection ownership.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the list store.
//! - Apply forward-only schema migrations in deterministic order.
//! - Own the single connection handle through an explicit [`Database`] context.
//!
//! # Invariants
//! - Schema version is tracked by rows in `schema_version`; the latest row wins.
//! - No repository may read or write data before migrations succeed.
//! - Foreign-key enforcement is on for every connection handed out.

mod database;
pub mod migrations;
mod open;

pub use database::Database;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database is not initialized; call Database::initialize first")]
    NotInitialized,
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    #[error("migration {version} ({name}) failed: {source}")]
    Migration {
        version: u32,
        name: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}
