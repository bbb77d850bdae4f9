//! Admin entry point for the subscriber store.
//!
//! # Responsibility
//! - Open (and initialize) a store file and run one operation against it.
//! - Print results as JSON so the output can be piped into other tools.
//!
//! Schema setup failure is fatal: the process exits with status 1.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::error;
use mailinglist_core::{
    init_logging, init_stderr_logging, RepoError, SqliteEmailRepository, StoreConfig,
    SubscriberService,
};
use serde_json::json;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

/// Manage mailing-list subscribers stored in SQLite.
#[derive(Parser, Debug)]
#[command(name = "mailinglist", version, about, long_about = None)]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "MAILINGLIST_DB", default_value = mailinglist_core::config::DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, env = "MAILINGLIST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr when unset.
    #[arg(long, env = "MAILINGLIST_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Busy timeout in milliseconds for concurrent writers.
    #[arg(long, env = "MAILINGLIST_BUSY_TIMEOUT_MS")]
    busy_timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database and its table if missing.
    Init,
    /// Register an address; existing addresses are left as they are.
    Add { email: String },
    /// Show one entry.
    Get { email: String },
    /// Record a confirmation, now or at the given Unix time.
    Confirm {
        email: String,
        #[arg(long)]
        at: Option<i64>,
    },
    /// Exclude an address from future batches.
    OptOut { email: String },
    /// List active subscribers, one page at a time.
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long, default_value_t = 50)]
        count: i64,
    },
}

/// Failure of a single command; printed to stderr before exiting.
#[derive(Debug)]
enum CliError {
    Store(RepoError),
    InvalidTimestamp(i64),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidTimestamp(seconds) => {
                write!(f, "--at `{seconds}` is not a representable Unix time")
            }
        }
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        let defaults = StoreConfig::default();
        StoreConfig {
            db_path: self.db.clone(),
            busy_timeout_ms: self.busy_timeout_ms.unwrap_or(defaults.busy_timeout_ms),
            log_level: self.log_level.clone().unwrap_or(defaults.log_level),
            log_dir: self.log_dir.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.store_config();

    let logging = match &config.log_dir {
        Some(dir) => init_logging(&config.log_level, &dir.to_string_lossy()),
        None => init_stderr_logging(&config.log_level),
    };
    if let Err(err) = logging {
        eprintln!("mailinglist: {err}");
        return ExitCode::FAILURE;
    }

    let conn = match config.open_db() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=cli_start module=cli status=error fatal={} error={err}",
                err.is_fatal()
            );
            eprintln!("mailinglist: cannot open {}: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let service = SubscriberService::new(SqliteEmailRepository::new(&conn));
    match run(&service, cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("mailinglist: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    service: &SubscriberService<SqliteEmailRepository<'_>>,
    command: Commands,
) -> Result<serde_json::Value, CliError> {
    let output = match command {
        Commands::Init => json!({ "status": "ok" }),
        Commands::Add { email } => {
            service.subscribe(&email)?;
            json!(service.lookup(&email)?)
        }
        Commands::Get { email } => json!(service.lookup(&email)?),
        Commands::Confirm { email, at } => {
            let at = match at {
                Some(seconds) => DateTime::from_timestamp(seconds, 0)
                    .ok_or(CliError::InvalidTimestamp(seconds))?,
                None => Utc::now(),
            };
            json!(service.confirm(&email, at)?)
        }
        Commands::OptOut { email } => {
            service.unsubscribe(&email)?;
            json!(service.lookup(&email)?)
        }
        Commands::List { page, count } => json!(service.active_batch(page, count)?),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, CliError, Commands};
    use clap::Parser;
    use mailinglist_core::db::open_db_in_memory;
    use mailinglist_core::{SqliteEmailRepository, SubscriberService};

    #[test]
    fn cli_parses_list_defaults() {
        let cli = Cli::try_parse_from(["mailinglist", "--db", "/tmp/x.db", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List { page: 1, count: 50 }));
        assert_eq!(cli.store_config().db_path.to_str(), Some("/tmp/x.db"));
    }

    #[test]
    fn add_then_confirm_prints_entry_json() {
        let conn = open_db_in_memory().unwrap();
        let service = SubscriberService::new(SqliteEmailRepository::new(&conn));

        let added = run(&service, Commands::Add { email: "a@x.com".into() }).unwrap();
        assert_eq!(added["email"], "a@x.com");
        assert!(added["confirmed_at"].is_null());

        let confirmed = run(
            &service,
            Commands::Confirm {
                email: "a@x.com".into(),
                at: Some(1_700_000_000),
            },
        )
        .unwrap();
        assert_eq!(confirmed["confirmed_at"], "2023-11-14T22:13:20Z");
    }

    #[test]
    fn get_unknown_prints_null() {
        let conn = open_db_in_memory().unwrap();
        let service = SubscriberService::new(SqliteEmailRepository::new(&conn));

        let output = run(&service, Commands::Get { email: "none@x.com".into() }).unwrap();
        assert!(output.is_null());
    }

    #[test]
    fn out_of_range_at_is_reported_as_cli_input_error() {
        let conn = open_db_in_memory().unwrap();
        let service = SubscriberService::new(SqliteEmailRepository::new(&conn));
        service.subscribe("a@x.com").unwrap();

        let err = run(
            &service,
            Commands::Confirm {
                email: "a@x.com".into(),
                at: Some(i64::MAX),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidTimestamp(i64::MAX)));
        assert!(err.to_string().starts_with("--at"));
    }
}
