//! Subscriber use-case service.
//!
//! # Responsibility
//! - Name the mailing-list flows (subscribe, confirm, unsubscribe) in terms
//!   of repository operations.
//! - Stay storage-agnostic; all SQL lives behind `EmailRepository`.

use crate::model::email_entry::EmailEntry;
use crate::repo::email_repo::{EmailRepository, RepoResult};
use chrono::{DateTime, Utc};

/// Use-case wrapper for subscriber management.
pub struct SubscriberService<R: EmailRepository> {
    repo: R,
}

impl<R: EmailRepository> SubscriberService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers an address. Re-subscribing a known address is a no-op.
    pub fn subscribe(&self, email: &str) -> RepoResult<()> {
        self.repo.create_email(email)
    }

    /// Marks a known address as confirmed at `at`.
    ///
    /// # Contract
    /// - Keeps the current opt-out flag.
    /// - Returns the entry as stored after the write, or `Ok(None)` when the
    ///   address is unknown.
    pub fn confirm(&self, email: &str, at: DateTime<Utc>) -> RepoResult<Option<EmailEntry>> {
        let Some(mut entry) = self.repo.get_email(email)? else {
            return Ok(None);
        };
        entry.confirm(at);
        self.repo.update_email(&entry)?;
        self.repo.get_email(email)
    }

    /// Opts the address out of future batches. Unknown addresses are ignored.
    pub fn unsubscribe(&self, email: &str) -> RepoResult<()> {
        self.repo.soft_delete_email(email)
    }

    pub fn lookup(&self, email: &str) -> RepoResult<Option<EmailEntry>> {
        self.repo.get_email(email)
    }

    /// Returns one 1-indexed page of active subscribers.
    pub fn active_batch(&self, page: i64, count: i64) -> RepoResult<Vec<EmailEntry>> {
        self.repo.list_batch(page, count)
    }
}
