//! Repository trait over the CRM tables

use crate::core::entity::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product};
use crate::core::query::{CustomerQuery, OrderQuery, ProductQuery};
use anyhow::{Result, anyhow};
use async_trait::async_trait;

/// Storage for customers, products and orders
///
/// Implementations own the persistence details; the mutation handlers only
/// see find-by-filter, get, create and update. Each method is atomic: when it
/// fails, none of its writes are visible.
///
/// The table constraints (unique email, phone pattern, positive price,
/// non-negative stock, existing foreign keys) are enforced here as well, so a
/// write that slips past validation (e.g. two concurrent requests with the
/// same email) fails with an error instead of corrupting data.
#[async_trait]
pub trait CrmStore: Send + Sync {
    /// Cheap round-trip used by health checks
    async fn ping(&self) -> Result<()>;

    /// Customers matching the query, sorted
    async fn find_customers(&self, query: &CustomerQuery) -> Result<Vec<Customer>>;

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>>;

    /// Whether a customer with exactly this email exists
    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Insert all rows in one transaction, returning them in input order
    async fn insert_customers(&self, rows: Vec<NewCustomer>) -> Result<Vec<Customer>>;

    async fn insert_customer(&self, row: NewCustomer) -> Result<Customer> {
        self.insert_customers(vec![row])
            .await?
            .pop()
            .ok_or_else(|| anyhow!("Customer insert returned no row"))
    }

    /// Products matching the query, sorted
    async fn find_products(&self, query: &ProductQuery) -> Result<Vec<Product>>;

    /// The products among `ids` that exist, ascending by id, each at most once
    async fn get_products(&self, ids: &[i64]) -> Result<Vec<Product>>;

    async fn insert_product(&self, row: NewProduct) -> Result<Product>;

    /// Overwrite a product's name, price and stock
    async fn update_product(&self, product: &Product) -> Result<Product>;

    /// Orders matching the query, sorted
    async fn find_orders(&self, query: &OrderQuery) -> Result<Vec<Order>>;

    /// Insert the order row, then its product associations, in one transaction
    async fn insert_order(&self, row: NewOrder) -> Result<Order>;

    /// Delete every row of every table
    async fn clear(&self) -> Result<()>;
}
