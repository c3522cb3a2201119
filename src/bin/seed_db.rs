//! Replace the contents of the configured store with the sample data set

use anyhow::Result;
use crm::prelude::*;
use crm::storage;

#[tokio::main]
async fn main() -> Result<()> {
    let config = CrmConfig::from_env()?;
    init_tracing(&config.logging);

    let store = storage::connect(&config.database).await?;
    let summary = seed_database(store.as_ref()).await?;

    println!(
        "Database seeded successfully! ({} customers, {} products, {} orders)",
        summary.customers, summary.products, summary.orders
    );
    Ok(())
}
