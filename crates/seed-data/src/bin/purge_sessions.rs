//! Removes every exam session record, after an explicit confirmation.
//!
//! Deletes by key only — applications that reference a removed session
//! are left in place.
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin purge-sessions
//! ```

use certstore::model::Partition;
use certstore::{BulkDeleter, DynamoStore, ScanFilter, StoreConfig};
use seed_data::prompt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = StoreConfig::from_env()?;
    let store = DynamoStore::connect(&config).await;
    let deleter = BulkDeleter::new(&store);

    let filter = ScanFilter::Partition(Partition::ExamSession);
    let sweep = deleter.collect_keys(&filter, None).await?;

    if sweep.keys.is_empty() {
        tracing::info!("No session records found. Nothing to do.");
        return Ok(());
    }

    tracing::info!("Found {} session records to delete.", sweep.keys.len());
    let confirmed = prompt::ask_confirmation(&format!(
        "Are you sure you want to permanently delete these {} records? (type 'yes' to confirm): ",
        sweep.keys.len()
    ))?;

    if !confirmed {
        tracing::info!("Operation cancelled. No records were deleted.");
        return Ok(());
    }

    let report = deleter.delete_keys(&sweep.keys).await;

    tracing::info!(
        "Session purge finished: {} deleted, {} failed",
        report.deleted,
        report.failed
    );

    Ok(())
}
