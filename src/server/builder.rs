//! ServerBuilder for fluent API to build the HTTP server

use super::exposure::{GraphQLExposure, RestExposure};
use super::host::ServerHost;
use crate::config::CrmConfig;
use crate::core::store::CrmStore;
use crate::seed::seed_database;
use crate::storage;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the CRM HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(config)
///     .with_store(InMemoryCrmStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: CrmConfig,
    store: Option<Arc<dyn CrmStore>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with default settings
    pub fn new() -> Self {
        Self {
            config: CrmConfig::default(),
            store: None,
            custom_routes: Vec::new(),
        }
    }

    /// Use these settings
    pub fn with_config(mut self, config: CrmConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the store (required unless [`connect_store`](Self::connect_store) is used)
    pub fn with_store(mut self, store: impl CrmStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already shared store
    pub fn with_shared_store(mut self, store: Arc<dyn CrmStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Open the store named by the database settings, and seed it when
    /// `seed_on_start` is set
    pub async fn connect_store(mut self) -> Result<Self> {
        let store = storage::connect(&self.config.database).await?;
        if self.config.database.seed_on_start {
            seed_database(store.as_ref()).await?;
        }
        self.store = Some(store);
        Ok(self)
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(&mut self) -> Result<ServerHost> {
        let store = self
            .store
            .take()
            .ok_or_else(|| anyhow::anyhow!("CrmStore is required. Call .with_store()"))?;

        ServerHost::from_builder_components(self.config.clone(), store)
    }

    /// Build the final router: REST health routes, GraphQL and custom routes,
    /// wrapped in request tracing and CORS
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);

        let rest = RestExposure::build_router(host.clone(), custom_routes)?;
        let graphql = GraphQLExposure::build_router(host)?;

        Ok(rest
            .merge(graphql)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_store(InMemoryCrmStore::new())
    ///     .serve("127.0.0.1:8000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
