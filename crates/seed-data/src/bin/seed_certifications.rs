//! Seeds certifications for applications whose payment completed.
//!
//! Requires `seed-applications` to have run first.
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed-certifications
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

    let report = seeder::seed_certifications(&store, 1, &mut rand::thread_rng()).await?;

    tracing::info!(
        "Certification seeding finished: {}/{} written, {} failed",
        report.succeeded,
        report.attempted,
        report.failed
    );

    Ok(())
}
