use rusqlite::Connection;
use tailorbook_core::db::migrations::latest_version;
use tailorbook_core::db::{open_db, open_db_in_memory, open_with_config, DbError};
use tailorbook_core::StoreConfig;

#[test]
fn open_db_in_memory_creates_customers_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "customers");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tailorbook.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute("INSERT INTO customers (name) VALUES ('Kept');", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM customers;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("tailorbook.db");

    let conn = open_with_config(&StoreConfig::file(&path)).unwrap();
    assert_table_exists(&conn, "customers");
    assert!(path.exists());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

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
fn new_rows_default_every_measurement_to_zero() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO customers (name) VALUES ('Bare');", [])
        .unwrap();

    let (phone, flap, address): (i64, f64, String) = conn
        .query_row(
            "SELECT phone, flap, address FROM customers WHERE name = 'Bare';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(phone, 0);
    assert_eq!(flap, 0.0);
    assert_eq!(address, "");
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
