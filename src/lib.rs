//! # CRM Graph
//!
//! A customer-relationship-management backend: customers, products and
//! orders behind a GraphQL API.
//!
//! ## Features
//!
//! - **GraphQL API**: Relay connections with filters, free-text search and
//!   ordering; validated mutations that report problems as data
//! - **Exact money**: prices and totals are fixed-point decimals
//! - **Pluggable storage**: in-memory for tests and demos, PostgreSQL behind
//!   the `postgres` feature
//! - **Order reminders**: a one-shot job that queries recent orders over HTTP
//!   and appends a report to a log file
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crm::prelude::*;
//!
//! let config = CrmConfig::from_env()?;
//! init_tracing(&config.logging);
//!
//! ServerBuilder::new()
//!     .with_config(config.clone())
//!     .connect_store()
//!     .await?
//!     .serve(&config.server.bind)
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod reminders;
pub mod seed;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product},
        error::{ConfigError, CrmError, QueryError, StorageError},
        filter::{CustomerFilter, OrderFilter, ProductFilter},
        query::{CustomerQuery, OrderQuery, ProductQuery, SortDirection, SortKey},
        service::{CrmService, CustomerInput, OrderInput, Outcome, ProductInput},
        store::CrmStore,
    };

    // === Storage ===
    pub use crate::storage::InMemoryCrmStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresCrmStore;

    // === Config ===
    pub use crate::config::{Backend, CrmConfig, init_tracing};

    // === Server ===
    pub use crate::server::exposure::graphql::{CrmSchema, build_schema};
    pub use crate::server::{ServerBuilder, ServerHost};

    // === Jobs ===
    pub use crate::reminders::{OrderReminderJob, ReminderOutcome};
    pub use crate::seed::seed_database;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
}
