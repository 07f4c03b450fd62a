//! Seeds randomized student records.
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed-students
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

    let count = prompt::ask_count("How many student records do you want to generate? ")?;
    let delay = prompt::ask_delay_secs(3)?;

    let store = DynamoStore::connect(&config).await;
    let mut rng = rand::thread_rng();

    let report = seeder::seed_students(&store, count, delay, &mut rng).await?;

    tracing::info!(
        "Student seeding finished: {}/{} written, {} failed",
        report.succeeded,
        report.attempted,
        report.failed
    );

    Ok(())
}
