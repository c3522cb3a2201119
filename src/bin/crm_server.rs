//! CRM GraphQL server
//!
//! Settings come from the YAML file named by `CRM_SETTINGS` (defaults
//! otherwise); `RUST_LOG` overrides the configured log filter.

use anyhow::Result;
use crm::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = CrmConfig::from_env()?;
    init_tracing(&config.logging);

    tracing::info!(
        backend = ?config.database.backend,
        playground = config.server.playground,
        "starting CRM server"
    );

    let bind = config.server.bind.clone();
    ServerBuilder::new()
        .with_config(config)
        .connect_store()
        .await?
        .serve(&bind)
        .await
}
