use goalplanner_core::db::migrations::latest_version;
use goalplanner_core::db::{open_db, open_db_in_memory, open_existing_db, DbError};
use goalplanner_core::{KvError, KvStore, SqliteKvStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_records");
}

#[test]
fn reopening_file_database_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("goalplanner.sqlite3");

    let conn_first = open_db(&path).unwrap();
    SqliteKvStore::try_new(&conn_first)
        .unwrap()
        .set("goal-planner:theme", b"true")
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let kv = SqliteKvStore::try_new(&conn_second).unwrap();
    assert_eq!(
        kv.get("goal-planner:theme").unwrap().as_deref(),
        Some(&b"true"[..])
    );
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
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
fn kv_store_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteKvStore::try_new(&conn) {
        Err(KvError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn kv_set_overwrites_and_lists_keys() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();

    assert_eq!(kv.get("b").unwrap(), None);
    kv.set("b", b"one").unwrap();
    kv.set("a", b"x").unwrap();
    kv.set("b", b"two").unwrap();

    assert_eq!(kv.get("b").unwrap().as_deref(), Some(&b"two"[..]));
    assert_eq!(kv.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn open_existing_refuses_to_create_a_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.sqlite3");

    match open_existing_db(&path) {
        Err(DbError::Missing(missing)) => assert_eq!(missing, path),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected missing database error"),
    }
    assert!(!path.exists());

    drop(open_db(&path).unwrap());
    let conn = open_existing_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn kv_store_can_own_its_connection() {
    let kv = SqliteKvStore::try_new(open_db_in_memory().unwrap()).unwrap();
    kv.set("goal-planner:tasks", b"[]").unwrap();

    assert_eq!(schema_version(kv.connection()), latest_version());
    assert_eq!(kv.get("goal-planner:tasks").unwrap().as_deref(), Some(&b"[]"[..]));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
