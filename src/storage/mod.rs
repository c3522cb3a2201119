//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryCrmStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresCrmStore;

use crate::config::{Backend, DatabaseConfig};
use crate::core::store::CrmStore;
use anyhow::Result;
use std::sync::Arc;

/// Open the store selected by the database settings
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn CrmStore>> {
    match config.backend {
        Backend::Memory => {
            tracing::info!("using in-memory storage");
            Ok(Arc::new(InMemoryCrmStore::new()))
        }
        Backend::Postgres => connect_postgres(config).await,
    }
}

#[cfg(feature = "postgres")]
async fn connect_postgres(config: &DatabaseConfig) -> Result<Arc<dyn CrmStore>> {
    use crate::core::error::ConfigError;

    let url = config.url.as_deref().ok_or_else(|| {
        crate::core::error::CrmError::from(ConfigError::Invalid {
            key: "database.url".to_string(),
            message: "required when database.backend is postgres".to_string(),
        })
    })?;

    let store = PostgresCrmStore::connect(url, config.max_connections).await?;
    if config.run_migrations {
        store.migrate().await?;
        tracing::info!("database migrations applied");
    }
    tracing::info!(max_connections = config.max_connections, "connected to postgres");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(_config: &DatabaseConfig) -> Result<Arc<dyn CrmStore>> {
    use crate::core::error::{ConfigError, CrmError};

    Err(CrmError::from(ConfigError::Invalid {
        key: "database.backend".to_string(),
        message: "this build does not include the `postgres` feature".to_string(),
    })
    .into())
}
