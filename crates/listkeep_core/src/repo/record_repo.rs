//! Record repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing order is `created_at ASC, rowid ASC` (entry order).
//! - Insert and copy check the owning collection inside the write
//!   transaction, so a missing parent is reported as `NotFound` rather than a
//!   foreign-key violation.

use super::collection_repo::collection_exists;
use super::{ensure_schema_ready, parse_bool, parse_uuid, RepoError, RepoResult};
use crate::model::collection::CollectionId;
use crate::model::record::{Record, RecordId};
use crate::model::EntityKind;
use rusqlite::{params, Connection, Row};

const RECORD_SELECT_SQL: &str =
    "SELECT id, collection_id, text, completed, created_at, updated_at FROM records";

pub trait RecordRepository {
    fn list_by_collection(&self, collection_id: CollectionId) -> RepoResult<Vec<Record>>;
    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>>;
    /// Inserts `record`; `NotFound` (field `collection_id`) when the parent is gone.
    fn insert_record(&self, record: &Record) -> RepoResult<()>;
    fn update_text(&self, id: RecordId, text: &str, updated_at: i64) -> RepoResult<Record>;
    fn toggle_completed(&self, id: RecordId, updated_at: i64) -> RepoResult<Record>;
    /// Persists a sibling of `id` with identical text and completion state.
    fn copy_record(&self, id: RecordId) -> RepoResult<Record>;
    fn delete_record(&self, id: RecordId) -> RepoResult<()>;
    fn count_by_collection(&self, collection_id: CollectionId) -> RepoResult<u64>;
    /// Returns the number of deleted rows.
    fn delete_by_collection(&self, collection_id: CollectionId) -> RepoResult<u64>;
}

pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn list_by_collection(&self, collection_id: CollectionId) -> RepoResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT_SQL}
             WHERE collection_id = ?1
             ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([collection_id.to_string()])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>> {
        select_record(self.conn, id)
    }

    fn insert_record(&self, record: &Record) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        ensure_parent(&tx, record.collection_id)?;
        insert_row(&tx, record)?;
        tx.commit()?;
        Ok(())
    }

    fn update_text(&self, id: RecordId, text: &str, updated_at: i64) -> RepoResult<Record> {
        self.update_and_read_back(
            id,
            "UPDATE records
             SET text = ?2, updated_at = MAX(updated_at, ?3)
             WHERE id = ?1;",
            params![id.to_string(), text, updated_at],
        )
    }

    fn toggle_completed(&self, id: RecordId, updated_at: i64) -> RepoResult<Record> {
        self.update_and_read_back(
            id,
            "UPDATE records
             SET completed = 1 - completed, updated_at = MAX(updated_at, ?2)
             WHERE id = ?1;",
            params![id.to_string(), updated_at],
        )
    }

    fn copy_record(&self, id: RecordId) -> RepoResult<Record> {
        let tx = self.conn.unchecked_transaction()?;
        let source =
            select_record(&tx, id)?.ok_or_else(|| RepoError::not_found(EntityKind::Record, id))?;
        let copy = source.duplicate();
        insert_row(&tx, &copy)?;
        tx.commit()?;
        Ok(copy)
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Record, id));
        }
        Ok(())
    }

    fn count_by_collection(&self, collection_id: CollectionId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE collection_id = ?1;",
            [collection_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count.unsigned_abs())
    }

    fn delete_by_collection(&self, collection_id: CollectionId) -> RepoResult<u64> {
        let deleted = self.conn.execute(
            "DELETE FROM records WHERE collection_id = ?1;",
            [collection_id.to_string()],
        )?;
        Ok(deleted as u64)
    }
}

impl SqliteRecordRepository<'_> {
    fn update_and_read_back(
        &self,
        id: RecordId,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Record> {
        let tx = self.conn.unchecked_transaction()?;
        if tx.execute(sql, params)? == 0 {
            return Err(RepoError::not_found(EntityKind::Record, id));
        }
        let stored = select_record(&tx, id)?
            .ok_or_else(|| RepoError::InvalidData(format!("record {id} missing after update")))?;
        tx.commit()?;
        Ok(stored)
    }
}

fn ensure_parent(conn: &Connection, collection_id: CollectionId) -> RepoResult<()> {
    if !collection_exists(conn, collection_id)? {
        return Err(RepoError::NotFound {
            entity: EntityKind::Collection,
            field: "collection_id",
            id: collection_id.to_string(),
        });
    }
    Ok(())
}

fn insert_row(conn: &Connection, record: &Record) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO records (id, collection_id, text, completed, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            record.id.to_string(),
            record.collection_id.to_string(),
            record.text.as_str(),
            record.completed,
            record.created_at,
            record.updated_at,
        ],
    )?;
    Ok(())
}

fn select_record(conn: &Connection, id: RecordId) -> RepoResult<Option<Record>> {
    let mut stmt = conn.prepare(&format!("{RECORD_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_record_row(row)?)),
        None => Ok(None),
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let id_text: String = row.get("id")?;
    let collection_text: String = row.get("collection_id")?;
    Ok(Record {
        id: parse_uuid(&id_text, "records.id")?,
        collection_id: parse_uuid(&collection_text, "records.collection_id")?,
        text: row.get("text")?,
        completed: parse_bool(row.get("completed")?, "records.completed")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
