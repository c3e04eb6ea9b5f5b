//! Repository layer: SQL behind per-entity traits.
//!
//! # Responsibility
//! - Keep every SQL statement inside the persistence boundary.
//! - Wrap multi-statement sequences (existence check + write, write +
//!   read-back) in one transaction.
//!
//! # Invariants
//! - Repositories only attach to connections migrated to `latest_version()`.
//! - Missing rows surface as `RepoError::NotFound`, never as constraint errors.

pub mod collection_repo;
pub mod preference_repo;
pub mod record_repo;

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::EntityKind;
use rusqlite::Connection;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("{entity} not found: {field}={id}")]
    NotFound {
        entity: EntityKind,
        field: &'static str,
        id: String,
    },
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("repository requires schema version {expected_version}, got {actual_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl RepoError {
    pub(crate) fn not_found(entity: EntityKind, id: Uuid) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            id: id.to_string(),
        }
    }
}

/// Rejects connections whose schema is not at the latest version.
pub(crate) fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean `{other}` in {column}"
        ))),
    }
}
