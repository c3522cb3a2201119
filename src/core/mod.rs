//! Core module containing the CRM domain: records, filters, queries, the
//! storage trait and the mutation handlers

pub mod entity;
pub mod error;
pub mod filter;
pub mod money;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;

pub use entity::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product};
pub use error::{CrmError, ErrorResponse};
pub use filter::{CustomerFilter, OrderFilter, ProductFilter};
pub use query::{CustomerQuery, OrderQuery, ProductQuery};
pub use service::{CrmService, CustomerInput, OrderInput, Outcome, ProductInput};
pub use store::CrmStore;
