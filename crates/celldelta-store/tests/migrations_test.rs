// Integration tests for the migration framework

use celldelta_store::migrations::{applied_migrations, apply_migrations};
use rusqlite::Connection;
use tempfile::TempDir;

fn table_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |_| Ok(()),
    )
    .is_ok()
}

#[test]
fn test_migrations_create_ledger_tables() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();

    assert!(table_exists(&conn, "schema_version"));
    assert!(table_exists(&conn, "snapshots"));
    assert!(table_exists(&conn, "snapshot_sequence"));
}

#[test]
fn test_migrations_persist_across_connections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.db");

    {
        let mut conn = Connection::open(&path).unwrap();
        apply_migrations(&mut conn).unwrap();
    }

    let mut conn = Connection::open(&path).unwrap();
    apply_migrations(&mut conn).unwrap();
    assert_eq!(applied_migrations(&conn).unwrap().len(), 1);
}

#[test]
fn test_record_count_must_be_positive() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();

    let result = conn.execute(
        "INSERT INTO snapshots (snapshot_id, format_version, created_at, source_descriptor, record_count)
         VALUES ('x', 'v1', '2024-01-01T00:00:00Z', 'file:x', 0)",
        [],
    );
    assert!(result.is_err());
}
