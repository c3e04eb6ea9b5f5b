//! Collection repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing order is `created_at DESC, rowid DESC` (newest first).
//! - Delete relies on `ON DELETE CASCADE` to remove owned records in the same
//!   statement.

use super::{ensure_schema_ready, parse_uuid, RepoError, RepoResult};
use crate::model::collection::{Collection, CollectionId};
use crate::model::EntityKind;
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLLECTION_SELECT_SQL: &str = "SELECT id, name, created_at, updated_at FROM collections";

pub trait CollectionRepository {
    fn list_collections(&self) -> RepoResult<Vec<Collection>>;
    fn get_collection(&self, id: CollectionId) -> RepoResult<Option<Collection>>;
    fn insert_collection(&self, collection: &Collection) -> RepoResult<()>;
    /// Renames and returns the stored row; `NotFound` when absent.
    fn rename_collection(
        &self,
        id: CollectionId,
        name: &str,
        updated_at: i64,
    ) -> RepoResult<Collection>;
    /// Deletes the collection and, through the cascade, its records.
    fn delete_collection(&self, id: CollectionId) -> RepoResult<()>;
    fn count_collections(&self) -> RepoResult<u64>;
}

pub struct SqliteCollectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCollectionRepository<'conn> {
    /// Attaches to a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CollectionRepository for SqliteCollectionRepository<'_> {
    fn list_collections(&self) -> RepoResult<Vec<Collection>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COLLECTION_SELECT_SQL} ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut collections = Vec::new();
        while let Some(row) = rows.next()? {
            collections.push(parse_collection_row(row)?);
        }
        Ok(collections)
    }

    fn get_collection(&self, id: CollectionId) -> RepoResult<Option<Collection>> {
        select_collection(self.conn, id)
    }

    fn insert_collection(&self, collection: &Collection) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO collections (id, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                collection.id.to_string(),
                collection.name.as_str(),
                collection.created_at,
                collection.updated_at,
            ],
        )?;
        Ok(())
    }

    fn rename_collection(
        &self,
        id: CollectionId,
        name: &str,
        updated_at: i64,
    ) -> RepoResult<Collection> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE collections
             SET name = ?2, updated_at = MAX(updated_at, ?3)
             WHERE id = ?1;",
            params![id.to_string(), name, updated_at],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Collection, id));
        }
        let stored = select_collection(&tx, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("collection {id} missing after rename"))
        })?;
        tx.commit()?;
        Ok(stored)
    }

    fn delete_collection(&self, id: CollectionId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM collections WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Collection, id));
        }
        Ok(())
    }

    fn count_collections(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM collections;", [], |row| row.get(0))?;
        Ok(count.unsigned_abs())
    }
}

fn select_collection(conn: &Connection, id: CollectionId) -> RepoResult<Option<Collection>> {
    let mut stmt = conn.prepare(&format!("{COLLECTION_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_collection_row(row)?)),
        None => Ok(None),
    }
}

/// Returns whether a collection row with `id` exists.
pub(crate) fn collection_exists(conn: &Connection, id: CollectionId) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM collections WHERE id = ?1;",
            [id.to_string()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn parse_collection_row(row: &Row<'_>) -> RepoResult<Collection> {
    let id_text: String = row.get("id")?;
    Ok(Collection {
        id: parse_uuid(&id_text, "collections.id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
