use mailinglist_core::db::{initialize_schema, open_db, open_db_in_memory, DbError, EMAILS_TABLE};
use mailinglist_core::{EmailRepository, SqliteEmailRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_emails_table() {
    let conn = open_db_in_memory().unwrap();
    assert_table_exists(&conn, EMAILS_TABLE);
}

#[test]
fn reopening_file_database_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.db");

    let conn_first = open_db(&path).unwrap();
    SqliteEmailRepository::new(&conn_first)
        .create_email("kept@x.com")
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    initialize_schema(&conn_second).unwrap();
    let entry = SqliteEmailRepository::new(&conn_second)
        .get_email("kept@x.com")
        .unwrap();
    assert!(entry.is_some());
}

#[test]
fn columns_have_expected_defaults() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO emails (email) VALUES ('raw@x.com');", [])
        .unwrap();

    let (confirmed_at, opt_out): (i64, i64) = conn
        .query_row(
            "SELECT confirmed_at, opt_out FROM emails WHERE email = 'raw@x.com';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(confirmed_at, 0);
    assert_eq!(opt_out, 0);
}

#[test]
fn email_column_rejects_null() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute("INSERT INTO emails (email) VALUES (NULL);", []);
    assert!(result.is_err());
}

#[test]
fn schema_failure_is_reported_as_fatal() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA query_only = ON;").unwrap();

    let err = initialize_schema(&conn).unwrap_err();
    assert!(matches!(err, DbError::Schema(_)));
    assert!(err.is_fatal());
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
