use mailinglist_core::db::open_db_in_memory;
use mailinglist_core::{EmailEntry, EmailRepository, SqliteEmailRepository};
use rusqlite::Connection;

fn seed(conn: &Connection, total: usize) -> Vec<EmailEntry> {
    let repo = SqliteEmailRepository::new(conn);
    (1..=total)
        .map(|n| {
            let email = format!("user{n}@x.com");
            repo.create_email(&email).unwrap();
            repo.get_email(&email).unwrap().unwrap()
        })
        .collect()
}

fn ids(entries: &[EmailEntry]) -> Vec<i64> {
    entries.iter().map(|entry| entry.id).collect()
}

#[test]
fn list_excludes_opted_out_and_orders_by_id() {
    let conn = open_db_in_memory().unwrap();
    let seeded = seed(&conn, 5);
    let repo = SqliteEmailRepository::new(&conn);

    repo.soft_delete_email(&seeded[2].email).unwrap();

    let batch = repo.list_batch(1, 10).unwrap();
    let expected = vec![seeded[0].id, seeded[1].id, seeded[3].id, seeded[4].id];
    assert_eq!(ids(&batch), expected);
    assert!(batch.iter().all(|entry| !entry.opt_out));
}

#[test]
fn list_windows_pages_from_one() {
    let conn = open_db_in_memory().unwrap();
    let seeded = seed(&conn, 10);
    let repo = SqliteEmailRepository::new(&conn);

    let batch = repo.list_batch(2, 3).unwrap();
    assert_eq!(ids(&batch), ids(&seeded[3..6]));
}

#[test]
fn last_page_may_be_partial() {
    let conn = open_db_in_memory().unwrap();
    let seeded = seed(&conn, 10);
    let repo = SqliteEmailRepository::new(&conn);

    let batch = repo.list_batch(4, 3).unwrap();
    assert_eq!(ids(&batch), ids(&seeded[9..]));
}

#[test]
fn page_beyond_data_is_empty() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, 5);
    let repo = SqliteEmailRepository::new(&conn);

    assert!(repo.list_batch(100, 10).unwrap().is_empty());
}

#[test]
fn opted_out_rows_do_not_shift_into_later_pages() {
    let conn = open_db_in_memory().unwrap();
    let seeded = seed(&conn, 6);
    let repo = SqliteEmailRepository::new(&conn);

    repo.soft_delete_email(&seeded[0].email).unwrap();
    repo.soft_delete_email(&seeded[1].email).unwrap();

    assert_eq!(ids(&repo.list_batch(1, 2).unwrap()), ids(&seeded[2..4]));
    assert_eq!(ids(&repo.list_batch(2, 2).unwrap()), ids(&seeded[4..6]));
}

#[test]
fn non_positive_page_reads_from_start() {
    let conn = open_db_in_memory().unwrap();
    let seeded = seed(&conn, 4);
    let repo = SqliteEmailRepository::new(&conn);

    assert_eq!(ids(&repo.list_batch(0, 2).unwrap()), ids(&seeded[0..2]));
    assert_eq!(ids(&repo.list_batch(-3, 2).unwrap()), ids(&seeded[0..2]));
}

#[test]
fn list_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmailRepository::new(&conn);

    assert!(repo.list_batch(1, 10).unwrap().is_empty());
}
