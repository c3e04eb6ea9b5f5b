//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register forward-only schema migrations in strictly increasing order.
//! - Apply each pending migration atomically together with its ledger row.
//!
//! # Invariants
//! - `version` values are strictly monotonic; there are no down migrations.
//! - A step body and its `schema_version` row commit in one transaction, so a
//!   failing step leaves the store at the previous version.
//! - Re-running the executor on an up-to-date store is a no-op.

use crate::db::{DbError, DbResult};
use crate::model::now_epoch_ms;
use log::{error, info};
use rusqlite::{params, Connection};

const SCHEMA_VERSION_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at INTEGER NOT NULL
);";

/// One forward schema step.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

/// Ledger row for an applied migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMigration {
    pub version: u32,
    /// Unix epoch milliseconds.
    pub applied_at: i64,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "core_tables",
        sql: include_str!("0001_core_tables.sql"),
    },
    Migration {
        version: 2,
        name: "record_completed",
        sql: include_str!("0002_record_completed.sql"),
    },
    Migration {
        version: 3,
        name: "preferences",
        sql: include_str!("0003_preferences.sql"),
    },
];

/// Returns the built-in migration list.
pub fn migrations() -> &'static [Migration] {
    MIGRATIONS
}

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending built-in migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    run_migrations(conn, MIGRATIONS)
}

/// Applies every step of `migrations` whose version is above the persisted one.
///
/// Each step runs in its own transaction. On failure the error is returned and
/// earlier steps stay committed.
pub fn run_migrations(conn: &mut Connection, migrations: &[Migration]) -> DbResult<()> {
    conn.execute_batch(SCHEMA_VERSION_TABLE_SQL)?;

    let current = current_version(conn)?;
    let latest = migrations.last().map_or(0, |migration| migration.version);

    if current > latest {
        error!(
            "event=db_migrate module=db status=error error_code=unsupported_schema db_version={} latest_supported={}",
            current, latest
        );
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    for migration in migrations.iter().filter(|m| m.version > current) {
        apply_one(conn, migration)?;
    }

    Ok(())
}

/// Returns the persisted schema version, or 0 when nothing has been applied.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    if !schema_table_exists(conn)? {
        return Ok(0);
    }
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version;",
        [],
        |row| row.get::<_, u32>(0),
    )?;
    Ok(version)
}

/// Lists applied migrations in ascending version order.
pub fn applied_migrations(conn: &Connection) -> DbResult<Vec<AppliedMigration>> {
    if !schema_table_exists(conn)? {
        return Ok(Vec::new());
    }
    let mut stmt =
        conn.prepare("SELECT version, applied_at FROM schema_version ORDER BY version ASC;")?;
    let rows = stmt.query_map([], |row| {
        Ok(AppliedMigration {
            version: row.get(0)?,
            applied_at: row.get(1)?,
        })
    })?;
    let mut applied = Vec::new();
    for row in rows {
        applied.push(row?);
    }
    Ok(applied)
}

fn apply_one(conn: &mut Connection, migration: &Migration) -> DbResult<()> {
    info!(
        "event=db_migrate module=db status=start version={} name={}",
        migration.version, migration.name
    );

    let wrap = |source: rusqlite::Error| DbError::Migration {
        version: migration.version,
        name: migration.name,
        source,
    };

    let result = (|| -> Result<(), rusqlite::Error> {
        let tx = conn.transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2);",
            params![migration.version, now_epoch_ms()],
        )?;
        tx.commit()
    })();

    match result {
        Ok(()) => {
            info!(
                "event=db_migrate module=db status=ok version={} name={}",
                migration.version, migration.name
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=db_migrate module=db status=error version={} name={} error={}",
                migration.version, migration.name, err
            );
            Err(wrap(err))
        }
    }
}

fn schema_table_exists(conn: &Connection) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'schema_version'
        );",
        [],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, migrations};

    #[test]
    fn versions_are_strictly_increasing() {
        let versions: Vec<u32> = migrations().iter().map(|m| m.version).collect();
        assert!(versions.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(versions.first(), Some(&1));
        assert_eq!(latest_version(), 3);
    }
}
