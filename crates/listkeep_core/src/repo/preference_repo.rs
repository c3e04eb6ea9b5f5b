//! Preferences singleton repository.
//!
//! The row is created by migration 3 and only ever updated in place. A
//! missing row is corrupted state and reported as `InvalidData`.

use super::{ensure_schema_ready, RepoError, RepoResult};
use crate::model::preferences::{ColorOverrides, Preferences, CUSTOM_SELECTION_ID};
use rusqlite::{params, Connection, OptionalExtension};

const PREFERENCES_ROW_ID: i64 = 1;

pub trait PreferenceRepository {
    fn load_preferences(&self) -> RepoResult<Preferences>;
    /// Sets the selection; overrides survive only when it is the custom sentinel.
    fn store_selection(&self, selection_id: &str, updated_at: i64) -> RepoResult<Preferences>;
    fn store_preferences(
        &self,
        selection_id: &str,
        overrides: Option<&ColorOverrides>,
        updated_at: i64,
    ) -> RepoResult<Preferences>;
}

pub struct SqlitePreferenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePreferenceRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PreferenceRepository for SqlitePreferenceRepository<'_> {
    fn load_preferences(&self) -> RepoResult<Preferences> {
        select_preferences(self.conn)
    }

    fn store_selection(&self, selection_id: &str, updated_at: i64) -> RepoResult<Preferences> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE preferences
             SET
                selection_id = ?2,
                overrides = CASE WHEN ?2 = ?3 THEN overrides ELSE NULL END,
                updated_at = MAX(updated_at, ?4)
             WHERE id = ?1;",
            params![
                PREFERENCES_ROW_ID,
                selection_id,
                CUSTOM_SELECTION_ID,
                updated_at
            ],
        )?;
        if changed == 0 {
            return Err(missing_row());
        }
        let stored = select_preferences(&tx)?;
        tx.commit()?;
        Ok(stored)
    }

    fn store_preferences(
        &self,
        selection_id: &str,
        overrides: Option<&ColorOverrides>,
        updated_at: i64,
    ) -> RepoResult<Preferences> {
        let serialized = overrides.map(serde_json::to_string).transpose()?;
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE preferences
             SET selection_id = ?2, overrides = ?3, updated_at = MAX(updated_at, ?4)
             WHERE id = ?1;",
            params![PREFERENCES_ROW_ID, selection_id, serialized, updated_at],
        )?;
        if changed == 0 {
            return Err(missing_row());
        }
        let stored = select_preferences(&tx)?;
        tx.commit()?;
        Ok(stored)
    }
}

fn select_preferences(conn: &Connection) -> RepoResult<Preferences> {
    let row = conn
        .query_row(
            "SELECT selection_id, overrides, created_at, updated_at
             FROM preferences
             WHERE id = ?1;",
            [PREFERENCES_ROW_ID],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            },
        )
        .optional()?;

    let (selection_id, overrides, created_at, updated_at) = row.ok_or_else(missing_row)?;
    let overrides = overrides
        .as_deref()
        .map(serde_json::from_str::<ColorOverrides>)
        .transpose()?;

    Ok(Preferences {
        selection_id,
        overrides,
        created_at,
        updated_at,
    })
}

fn missing_row() -> RepoError {
    RepoError::InvalidData("preferences singleton row is missing".to_string())
}
