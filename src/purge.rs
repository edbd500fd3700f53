//! urlstash-purge — trash retention maintenance binary.
//!
//! Permanently removes entries that have been in the trash longer than the
//! retention window. Intended to be invoked periodically by an external
//! scheduler (cron, systemd timer) against the live database file:
//!
//! ```text
//! urlstash-purge /var/lib/urlstash/urlstash.db
//! ```

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use urlstash::database::Database;
use urlstash::managers::trash_manager::{TrashManager, TrashManagerTrait};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: urlstash-purge <database-file>");
            return ExitCode::FAILURE;
        }
    };

    match run(&path) {
        Ok(purged) => {
            println!("{} expired entries purged", purged);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("purge failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let db = Database::open(path)?;
    let mut trash = TrashManager::new(db.connection());
    Ok(trash.purge_expired()?)
}
