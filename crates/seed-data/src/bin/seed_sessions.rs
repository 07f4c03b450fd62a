//! Seeds exam session schedules over existing exams and venues.
//!
//! Requires `seed-exams` and `seed-venues` to have run first.
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed-sessions
//! ```

use certstore::{DynamoStore, StoreConfig};
use seed_data::{prompt, seeder};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = StoreConfig::from_env()?;

    let count =
        prompt::ask_count_or_default("How many sessions do you want to generate? (default 5) ", 5)?;

    let store = DynamoStore::connect(&config).await;
    let mut rng = rand::thread_rng();

    let report = seeder::seed_sessions(&store, count, 1, &mut rng).await?;

    tracing::info!(
        "Session seeding finished: {}/{} written, {} failed",
        report.succeeded,
        report.attempted,
        report.failed
    );

    Ok(())
}
