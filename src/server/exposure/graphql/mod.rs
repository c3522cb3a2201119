//! GraphQL API exposure
//!
//! Serves the CRM schema over HTTP:
//!
//! - `POST /graphql`: queries and mutations
//! - `GET /graphql`: the GraphQL playground, when enabled in the settings
//! - `GET /graphql/schema`: the schema in SDL form

mod connection;
mod schema;
mod types;

pub use connection::{OffsetCursor, TotalCount};
pub use schema::{CrmSchema, MutationRoot, QueryRoot, build_schema};
pub use types::{CustomerType, OrderType, ProductType};

use crate::server::host::ServerHost;
use anyhow::Result;
use async_graphql::http::{GraphQLPlaygroundConfig, playground_source};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::Extension,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use std::sync::Arc;

/// GraphQL API exposure implementation
pub struct GraphQLExposure;

impl GraphQLExposure {
    /// Build the GraphQL router from a host
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let host = Arc::new(builder.build_host()?);
    /// let graphql_app = GraphQLExposure::build_router(host)?;
    /// ```
    pub fn build_router(host: Arc<ServerHost>) -> Result<Router> {
        let graphql = if host.config.server.playground {
            post(graphql_handler).get(graphql_playground)
        } else {
            post(graphql_handler)
        };

        let router = Router::new()
            .route("/graphql", graphql)
            .route("/graphql/schema", get(graphql_sdl))
            .layer(Extension(host.schema.clone()));

        Ok(router)
    }
}

/// Handler for GraphQL queries and mutations
async fn graphql_handler(
    Extension(schema): Extension<CrmSchema>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(request.into_inner()).await.into()
}

/// Handler for the GraphQL playground UI
async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

/// Handler for GraphQL schema SDL export
async fn graphql_sdl(Extension(schema): Extension<CrmSchema>) -> impl IntoResponse {
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        schema.sdl(),
    )
}
