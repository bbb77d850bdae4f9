//! Domain model for mailing-list subscribers.
//!
//! # Invariants
//! - The email address is the natural key of every entry.
//! - Opting out is represented by a flag, never by removing the entry.

pub mod email_entry;
