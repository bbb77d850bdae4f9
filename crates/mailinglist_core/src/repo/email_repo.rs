//! Email repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/update/opt-out/batch-list over the `emails` table.
//! - Map between `EmailEntry` and its stored row shape.
//!
//! # Invariants
//! - Inserting a known address leaves the existing row untouched.
//! - `confirmed_at = 0` in storage maps to `None` in memory and back.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::email_entry::EmailEntry;
use chrono::{DateTime, Utc};
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMAIL_SELECT_SQL: &str = "SELECT
    id,
    email,
    confirmed_at,
    opt_out
FROM emails";

/// Storage value meaning "not confirmed".
const UNCONFIRMED_SENTINEL: i64 = 0;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for subscriber persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A stored row could not be mapped, or an entry cannot be stored as-is.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid email data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for subscriber entries.
pub trait EmailRepository {
    /// Registers `email`; succeeds without changes if it already exists.
    fn create_email(&self, email: &str) -> RepoResult<()>;
    fn get_email(&self, email: &str) -> RepoResult<Option<EmailEntry>>;
    /// Writes `confirmed_at` and `opt_out` for the row keyed by `entry.email`.
    fn update_email(&self, entry: &EmailEntry) -> RepoResult<()>;
    /// Sets the opt-out flag; the row itself is kept.
    fn soft_delete_email(&self, email: &str) -> RepoResult<()>;
    /// Lists active entries by ascending id, 1-indexed pages of `count`.
    fn list_batch(&self, page: i64, count: i64) -> RepoResult<Vec<EmailEntry>>;
}

/// SQLite-backed email repository.
///
/// Borrows the caller's connection; opening and closing it is the caller's
/// business.
pub struct SqliteEmailRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmailRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_one(&self, email: &str) -> RepoResult<Option<EmailEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMAIL_SELECT_SQL} WHERE email = ?1;"))?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_email_row(row)?));
        }

        Ok(None)
    }

    fn query_active_page(&self, limit: i64, offset: i64) -> RepoResult<Vec<EmailEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EMAIL_SELECT_SQL}
             WHERE opt_out = 0
             ORDER BY id ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![limit, offset])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_email_row(row)?);
        }
        Ok(entries)
    }
}

impl EmailRepository for SqliteEmailRepository<'_> {
    fn create_email(&self, email: &str) -> RepoResult<()> {
        let inserted = self
            .conn
            .execute(
                "INSERT INTO emails (email, confirmed_at, opt_out)
                 VALUES (?1, ?2, 0)
                 ON CONFLICT(email) DO NOTHING;",
                params![email, UNCONFIRMED_SENTINEL],
            )
            .map_err(|err| log_failure("email_create", err))?;

        debug!("event=email_create module=repo status=ok inserted={inserted}");
        Ok(())
    }

    fn get_email(&self, email: &str) -> RepoResult<Option<EmailEntry>> {
        self.query_one(email)
            .map_err(|err| log_repo_failure("email_get", err))
    }

    fn update_email(&self, entry: &EmailEntry) -> RepoResult<()> {
        let confirmed_at = confirmed_at_to_db(entry.confirmed_at)
            .map_err(|err| log_repo_failure("email_update", err))?;

        let changed = self
            .conn
            .execute(
                "UPDATE emails
                 SET
                    confirmed_at = ?1,
                    opt_out = ?2
                 WHERE email = ?3;",
                params![
                    confirmed_at,
                    bool_to_int(entry.opt_out),
                    entry.email.as_str(),
                ],
            )
            .map_err(|err| log_failure("email_update", err))?;

        debug!("event=email_update module=repo status=ok changed={changed}");
        Ok(())
    }

    fn soft_delete_email(&self, email: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("UPDATE emails SET opt_out = 1 WHERE email = ?1;", [email])
            .map_err(|err| log_failure("email_opt_out", err))?;

        debug!("event=email_opt_out module=repo status=ok changed={changed}");
        Ok(())
    }

    fn list_batch(&self, page: i64, count: i64) -> RepoResult<Vec<EmailEntry>> {
        // Not validated: page <= 0 yields a negative offset, which SQLite
        // clamps to zero.
        let offset = page.saturating_sub(1).saturating_mul(count);

        self.query_active_page(count, offset)
            .map_err(|err| log_repo_failure("email_list_batch", err))
    }
}

fn parse_email_row(row: &Row<'_>) -> RepoResult<EmailEntry> {
    let confirmed_at = confirmed_at_from_db(row.get("confirmed_at")?)?;

    let opt_out = match row.get::<_, i64>("opt_out")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid opt_out value `{other}` in emails.opt_out"
            )));
        }
    };

    Ok(EmailEntry {
        id: row.get("id")?,
        email: row.get("email")?,
        confirmed_at,
        opt_out,
    })
}

/// Rejects a confirmation at the Unix epoch: it would collide with the
/// "not confirmed" sentinel and read back as `None`.
fn confirmed_at_to_db(value: Option<DateTime<Utc>>) -> RepoResult<i64> {
    match value {
        None => Ok(UNCONFIRMED_SENTINEL),
        Some(at) if at.timestamp() == UNCONFIRMED_SENTINEL => Err(RepoError::InvalidData(
            format!("confirmed_at `{at}` collides with the unconfirmed marker"),
        )),
        Some(at) => Ok(at.timestamp()),
    }
}

fn confirmed_at_from_db(seconds: i64) -> RepoResult<Option<DateTime<Utc>>> {
    if seconds == UNCONFIRMED_SENTINEL {
        return Ok(None);
    }
    DateTime::from_timestamp(seconds, 0).map(Some).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "out of range timestamp `{seconds}` in emails.confirmed_at"
        ))
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn log_failure(event: &str, err: rusqlite::Error) -> RepoError {
    log_repo_failure(event, err.into())
}

fn log_repo_failure(event: &str, err: RepoError) -> RepoError {
    error!("event={event} module=repo status=error error={err}");
    err
}
