//! HTTP server: the GraphQL API plus operational REST routes
//!
//! `ServerBuilder` assembles a `ServerHost` from settings and a store, then
//! exposes it through:
//! - `RestExposure`: health checks and custom routes
//! - `GraphQLExposure`: the CRM schema, playground and SDL

pub mod builder;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use exposure::{GraphQLExposure, RestExposure};
pub use host::ServerHost;
