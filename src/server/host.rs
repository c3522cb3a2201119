//! Server host for transport-agnostic API exposure
//!
//! The host holds the state every exposure needs: settings, the CRM service
//! and the executable GraphQL schema built on top of it.

use crate::config::CrmConfig;
use crate::core::service::CrmService;
use crate::core::store::CrmStore;
use crate::server::exposure::graphql::{CrmSchema, build_schema};
use anyhow::Result;
use std::sync::Arc;

/// Host context containing all server state
///
/// # Example
///
/// ```rust,ignore
/// let host = Arc::new(ServerHost::from_builder_components(config, store)?);
/// let rest_app = RestExposure::build_router(host.clone(), vec![])?;
/// let graphql_app = GraphQLExposure::build_router(host)?;
/// ```
pub struct ServerHost {
    /// Settings the server was started with
    pub config: Arc<CrmConfig>,

    /// Mutation handlers and reads over the store
    pub service: CrmService,

    /// Executable schema, sharing `service`
    pub schema: CrmSchema,
}

impl ServerHost {
    /// Build the host from builder components
    pub fn from_builder_components(config: CrmConfig, store: Arc<dyn CrmStore>) -> Result<Self> {
        let service = CrmService::new(store);
        let schema = build_schema(service.clone());

        Ok(Self {
            config: Arc::new(config),
            service,
            schema,
        })
    }
}
