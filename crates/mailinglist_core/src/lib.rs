//! Subscriber store for a mailing list.
//! Persists addresses with confirmation time and opt-out state in SQLite.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::email_entry::{EmailEntry, EntryId};
pub use repo::email_repo::{EmailRepository, RepoError, RepoResult, SqliteEmailRepository};
pub use service::subscriber_service::SubscriberService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
