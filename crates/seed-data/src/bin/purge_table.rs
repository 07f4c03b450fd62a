//! Removes seeded records table-wide, keeping a protected set of users.
//!
//! Items whose `username` matches the keep list (env `SEED_KEEP_USERNAMES`,
//! comma-separated) survive; everything else is a deletion candidate. The
//! scope prompt limits how many candidates are deleted.
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin purge-table
//! ```

use certstore::{BulkDeleter, DynamoStore, ScanFilter, StoreConfig};
use seed_data::prompt::{self, PurgeScope};
use tracing_subscriber::EnvFilter;

const DEFAULT_KEEP: &[&str] = &["admin", "admin-portal"];

fn keep_usernames() -> Vec<String> {
    match std::env::var("SEED_KEEP_USERNAMES") {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => DEFAULT_KEEP.iter().map(|name| name.to_string()).collect(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = StoreConfig::from_env()?;
    let keep = keep_usernames();

    let confirmed = prompt::ask_confirmation(&format!(
        "This will delete items from '{}' except where username is in {:?}.\nHave you backed up your table? (yes/no): ",
        config.table, keep
    ))?;
    if !confirmed {
        tracing::info!("Operation cancelled.");
        return Ok(());
    }

    let scope = prompt::ask_purge_scope()?;
    let limit = match scope {
        PurgeScope::All => None,
        PurgeScope::Count(count) => Some(count),
    };

    let store = DynamoStore::connect(&config).await;
    let deleter = BulkDeleter::new(&store);

    let filter = ScanFilter::ExcludeUsernames(keep);
    let sweep = deleter.collect_keys(&filter, limit).await?;

    if sweep.keys.is_empty() {
        tracing::info!("No items found to delete. All remaining items are in the keep list.");
        return Ok(());
    }

    tracing::info!(
        "Preparing to delete {} items ({} scanned). Starting batch deletion...",
        sweep.keys.len(),
        sweep.scanned
    );
    let report = deleter.delete_keys(&sweep.keys).await;

    tracing::info!(
        "Purge finished: {} deleted, {} failed",
        report.deleted,
        report.failed
    );

    Ok(())
}
