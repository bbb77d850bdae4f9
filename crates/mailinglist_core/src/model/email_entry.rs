//! Subscriber entry model.
//!
//! # Responsibility
//! - Define the canonical record for one subscriber address.
//! - Provide lifecycle helpers for confirmation and opt-out.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `confirmed_at == None` means "not confirmed"; it is never encoded as
//!   the Unix epoch in memory.
//! - No helper flips `opt_out` back to `false`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned identity of an entry.
pub type EntryId = i64;

/// One subscriber record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailEntry {
    pub id: EntryId,
    /// Subscriber address, unique across the store.
    pub email: String,
    /// Instant the subscriber confirmed the address (double opt-in).
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Withdrawn subscribers are excluded from batch listings.
    pub opt_out: bool,
}

impl EmailEntry {
    /// Builds an unconfirmed, active entry.
    pub fn new(id: EntryId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            confirmed_at: None,
            opt_out: false,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }

    /// Returns whether this entry should appear in batch listings.
    pub fn is_active(&self) -> bool {
        !self.opt_out
    }

    /// Records the confirmation instant.
    pub fn confirm(&mut self, at: DateTime<Utc>) {
        self.confirmed_at = Some(at);
    }

    pub fn mark_opted_out(&mut self) {
        self.opt_out = true;
    }
}
