//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for subscriber entries.
//! - Keep SQLite query details out of service code.
//!
//! # Invariants
//! - Absence of a row is reported as `Ok(None)` or a no-op, never as an error.
//! - Every storage failure is logged before it is returned.

pub mod email_repo;
