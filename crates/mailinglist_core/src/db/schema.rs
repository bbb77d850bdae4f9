//! Idempotent schema setup for the `emails` table.
//!
//! `confirmed_at = 0` is the storage sentinel for "not confirmed"; it never
//! leaves the repository layer.

use super::{DbError, DbResult};
use log::{debug, error};
use rusqlite::Connection;

/// Name of the single table owned by the store.
pub const EMAILS_TABLE: &str = "emails";

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the `emails` table when it does not exist yet.
///
/// Safe to call on every startup; existing rows are left untouched.
///
/// # Errors
/// - Returns `DbError::Schema` for any failure. There is no recoverable
///   variant: the store cannot operate without its table.
pub fn initialize_schema(conn: &Connection) -> DbResult<()> {
    match conn.execute_batch(SCHEMA_SQL) {
        Ok(()) => {
            debug!("event=schema_init module=db status=ok table={EMAILS_TABLE}");
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_init module=db status=error table={EMAILS_TABLE} error={err}"
            );
            Err(DbError::Schema(err))
        }
    }
}
