//! REST endpoints that sit beside the GraphQL API
//!
//! Only operational routes live here; all business reads and writes go
//! through GraphQL.

use super::super::host::ServerHost;
use crate::core::error::CrmError;
use anyhow::Result;
use axum::{Json, Router, extract::Extension, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with the health check routes and every custom router
    /// merged in.
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let mut app = Self::health_routes().layer(Extension(host));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app)
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    ///
    /// Round-trips to the store; a failing store turns into the matching
    /// `CrmError` status (503 when the backend is unreachable).
    async fn health_check(
        Extension(host): Extension<Arc<ServerHost>>,
    ) -> Result<Json<Value>, CrmError> {
        host.service.store().ping().await.map_err(CrmError::from)?;

        Ok(Json(json!({
            "status": "ok",
            "service": "crm-graph",
            "backend": host.config.database.backend,
        })))
    }
}
