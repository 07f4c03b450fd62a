//! Seeds the curated exam venue fixtures.
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed-venues
//! ```

use certstore::{DynamoStore, StoreConfig};
use seed_data::seeder;
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

    let report = seeder::seed_venues(&store, 1).await?;

    tracing::info!(
        "Venue seeding finished: {}/{} written, {} failed",
        report.succeeded,
        report.attempted,
        report.failed
    );

    Ok(())
}
