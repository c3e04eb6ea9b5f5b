use listkeep_core::db::migrations::{
    applied_migrations, apply_migrations, current_version, latest_version, migrations,
    run_migrations, Migration,
};
use listkeep_core::db::{open_db, open_db_in_memory};
use listkeep_core::{
    Database, DbError, RepoError, SqliteCollectionRepository, StoreConfig,
};
use rusqlite::Connection;
use std::time::Duration;

#[test]
fn in_memory_database_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "collections");
    assert_table_exists(&conn, "records");
    assert_table_exists(&conn, "preferences");
    assert_table_exists(&conn, "schema_version");

    let versions: Vec<u32> = applied_migrations(&conn)
        .unwrap()
        .into_iter()
        .map(|applied| applied.version)
        .collect();
    assert_eq!(versions, vec![1, 2, 3]);
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn preferences_row_is_seeded_with_default_selection() {
    let conn = open_db_in_memory().unwrap();
    let (count, selection, overrides): (i64, String, Option<String>) = conn
        .query_row(
            "SELECT COUNT(*), MAX(selection_id), MAX(overrides) FROM preferences;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(selection, "default");
    assert!(overrides.is_none());
}

#[test]
fn reopening_a_file_database_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lists.db");

    let conn = open_db(&path, Duration::from_secs(1)).unwrap();
    conn.execute_batch(
        "INSERT INTO collections (id, name, created_at, updated_at)
         VALUES ('00000000-0000-4000-8000-000000000001', 'Groceries', 10, 10);
         INSERT INTO records (id, collection_id, text, completed, created_at, updated_at)
         VALUES ('00000000-0000-4000-8000-000000000002',
                 '00000000-0000-4000-8000-000000000001', 'Milk', 1, 11, 11);",
    )
    .unwrap();
    let first = dump(&conn);
    drop(conn);

    let mut conn = open_db(&path, Duration::from_secs(1)).unwrap();
    apply_migrations(&mut conn).unwrap();

    assert_eq!(dump(&conn), first);
    assert_eq!(current_version(&conn).unwrap(), latest_version());
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE schema_version (version INTEGER PRIMARY KEY, applied_at INTEGER NOT NULL);
         INSERT INTO schema_version (version, applied_at) VALUES (999, 0);",
    )
    .unwrap();
    drop(conn);

    match open_db(&path, Duration::from_secs(1)).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failing_step_keeps_previous_version_committed() {
    let mut conn = Connection::open_in_memory().unwrap();
    let steps = [
        Migration {
            version: 1,
            name: "first",
            sql: "CREATE TABLE first_table (x INTEGER);",
        },
        Migration {
            version: 2,
            name: "broken",
            sql: "CREATE TABLE second_table (x INTEGER);
                  INSERT INTO no_such_table VALUES (1);",
        },
    ];

    let err = run_migrations(&mut conn, &steps).unwrap_err();
    assert!(matches!(err, DbError::Migration { version: 2, .. }));
    assert_eq!(current_version(&conn).unwrap(), 1);
    assert_table_exists(&conn, "first_table");
    assert_table_missing(&conn, "second_table");

    let fixed = [
        steps[0],
        Migration {
            version: 2,
            name: "fixed",
            sql: "CREATE TABLE second_table (x INTEGER);",
        },
    ];
    run_migrations(&mut conn, &fixed).unwrap();
    assert_eq!(current_version(&conn).unwrap(), 2);
    assert_table_exists(&conn, "second_table");
}

#[test]
fn completion_flag_backfills_existing_records_as_false() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    run_migrations(&mut conn, &migrations()[..1]).unwrap();
    conn.execute_batch(
        "INSERT INTO collections (id, name, created_at, updated_at)
         VALUES ('00000000-0000-4000-8000-000000000001', 'Old list', 1, 1);
         INSERT INTO records (id, collection_id, text, created_at, updated_at)
         VALUES ('00000000-0000-4000-8000-000000000002',
                 '00000000-0000-4000-8000-000000000001', 'Old entry', 2, 2);",
    )
    .unwrap();

    apply_migrations(&mut conn).unwrap();

    let completed: i64 = conn
        .query_row("SELECT completed FROM records;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(completed, 0);
    assert_eq!(current_version(&conn).unwrap(), latest_version());
}

#[test]
fn repositories_reject_unmigrated_connections() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteCollectionRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn database_initialize_runs_migrations_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::new(StoreConfig::file(dir.path().join("lists.db")));

    let first = applied_migrations(db.initialize().unwrap()).unwrap();
    let second = applied_migrations(db.initialize().unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);

    db.close().unwrap();
    assert!(matches!(db.connection(), Err(DbError::NotInitialized)));

    let reopened = applied_migrations(db.initialize().unwrap()).unwrap();
    assert_eq!(reopened, first);
}

fn dump(conn: &Connection) -> Vec<String> {
    let mut lines = Vec::new();
    for sql in [
        "SELECT version || '|' || applied_at FROM schema_version ORDER BY version;",
        "SELECT id || '|' || name || '|' || created_at || '|' || updated_at
         FROM collections ORDER BY id;",
        "SELECT id || '|' || collection_id || '|' || text || '|' || completed || '|'
                || created_at || '|' || updated_at
         FROM records ORDER BY id;",
        "SELECT selection_id || '|' || COALESCE(overrides, '') || '|' || created_at || '|'
                || updated_at
         FROM preferences;",
    ] {
        let mut stmt = conn.prepare(sql).unwrap();
        let rows = stmt.query_map([], |row| row.get::<_, String>(0)).unwrap();
        for row in rows {
            lines.push(row.unwrap());
        }
    }
    lines
}

fn table_exists(conn: &Connection, table_name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert!(table_exists(conn, table_name), "table {table_name} does not exist");
}

fn assert_table_missing(conn: &Connection, table_name: &str) {
    assert!(!table_exists(conn, table_name), "table {table_name} should not exist");
}
