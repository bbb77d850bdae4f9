//! SQLite storage bootstrap and schema entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the subscriber store.
//! - Ensure the `emails` table exists before any caller touches data.
//!
//! # Invariants
//! - Schema setup is idempotent (`CREATE TABLE IF NOT EXISTS`).
//! - A connection whose schema setup failed is never handed out.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory, open_db_with_timeout, DEFAULT_BUSY_TIMEOUT};
pub use schema::{initialize_schema, EMAILS_TABLE};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Schema setup failed; callers must treat this as a startup failure.
    Schema(rusqlite::Error),
}

impl DbError {
    /// Whether the process can continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Schema(err) => write!(f, "schema initialization failed: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Schema(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
