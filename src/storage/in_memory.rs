//! In-memory implementation of CrmStore for testing and development

use crate::core::entity::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product};
use crate::core::filter::{customer_search_matches, order_search_matches, product_search_matches};
use crate::core::query::{CustomerQuery, OrderQuery, ProductQuery, sort_records};
use crate::core::store::CrmStore;
use crate::core::validation::{
    MAX_CUSTOMER_NAME_LENGTH, MAX_EMAIL_LENGTH, MAX_PRODUCT_NAME_LENGTH, fits_length,
    is_valid_phone, validate_price, validate_total,
};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

fn check_length(column: &str, value: &str, max: usize) -> Result<()> {
    if !fits_length(value, max) {
        bail!("value too long for {} (limit {} characters)", column, max);
    }
    Ok(())
}

#[derive(Default)]
struct Tables {
    customers: BTreeMap<i64, Customer>,
    products: BTreeMap<i64, Product>,
    orders: BTreeMap<i64, Order>,
    next_customer_id: i64,
    next_product_id: i64,
    next_order_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn check_customer(&self, row: &NewCustomer, pending: &BTreeSet<&str>) -> Result<()> {
        check_length("name", &row.name, MAX_CUSTOMER_NAME_LENGTH)?;
        check_length("email", &row.email, MAX_EMAIL_LENGTH)?;
        if pending.contains(row.email.as_str())
            || self.customers.values().any(|c| c.email == row.email)
        {
            bail!("duplicate key value violates unique constraint on email '{}'", row.email);
        }
        if let Some(phone) = &row.phone {
            if !is_valid_phone(phone) {
                bail!("check constraint violated: phone '{}'", phone);
            }
        }
        Ok(())
    }

    fn check_product(name: &str, price: Decimal, stock: i32) -> Result<()> {
        check_length("name", name, MAX_PRODUCT_NAME_LENGTH)?;
        validate_price(price).map_err(|e| anyhow!("check constraint violated: {}", e))?;
        if stock < 0 {
            bail!("check constraint violated: stock {} is negative", stock);
        }
        Ok(())
    }

    fn check_order(row: &NewOrder) -> Result<()> {
        validate_total(row.total_amount).map_err(|e| anyhow!("numeric field overflow: {}", e))
    }

    /// An order's customer and products, as far as they still exist
    fn relations(&self, order: &Order) -> (Option<&Customer>, Vec<&Product>) {
        let customer = self.customers.get(&order.customer_id);
        let products = order
            .product_ids
            .iter()
            .filter_map(|id| self.products.get(id))
            .collect();
        (customer, products)
    }
}

/// In-memory CRM store
///
/// Useful for testing and development. All tables live behind one `RwLock`,
/// so every call observes and produces a consistent snapshot.
#[derive(Clone, Default)]
pub struct InMemoryCrmStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCrmStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CrmStore for InMemoryCrmStore {
    async fn ping(&self) -> Result<()> {
        self.tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(())
    }

    async fn find_customers(&self, query: &CustomerQuery) -> Result<Vec<Customer>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut customers: Vec<Customer> = tables
            .customers
            .values()
            .filter(|c| query.filter.matches(c))
            .filter(|c| {
                query
                    .search_term()
                    .is_none_or(|term| customer_search_matches(c, term))
            })
            .cloned()
            .collect();

        sort_records(&mut customers, &query.order_by);
        Ok(customers)
    }

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(tables.customers.get(&id).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(tables.customers.values().any(|c| c.email == email))
    }

    async fn insert_customers(&self, rows: Vec<NewCustomer>) -> Result<Vec<Customer>> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        // Check every row before writing any, so a failure leaves no trace
        let mut pending = BTreeSet::new();
        for row in &rows {
            tables.check_customer(row, &pending)?;
            pending.insert(row.email.as_str());
        }

        let now = Utc::now();
        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            let id = Tables::next_id(&mut tables.next_customer_id);
            let customer = Customer {
                id,
                name: row.name,
                email: row.email,
                phone: row.phone,
                created_at: now,
            };
            tables.customers.insert(id, customer.clone());
            created.push(customer);
        }

        Ok(created)
    }

    async fn find_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut products: Vec<Product> = tables
            .products
            .values()
            .filter(|p| query.filter.matches(p))
            .filter(|p| {
                query
                    .search_term()
                    .is_none_or(|term| product_search_matches(p, term))
            })
            .cloned()
            .collect();

        sort_records(&mut products, &query.order_by);
        Ok(products)
    }

    async fn get_products(&self, ids: &[i64]) -> Result<Vec<Product>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let wanted: BTreeSet<i64> = ids.iter().copied().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| tables.products.get(&id).cloned())
            .collect())
    }

    async fn insert_product(&self, row: NewProduct) -> Result<Product> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Tables::check_product(&row.name, row.price, row.stock)?;

        let id = Tables::next_id(&mut tables.next_product_id);
        let product = Product {
            id,
            name: row.name,
            price: row.price,
            stock: row.stock,
        };
        tables.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, product: &Product) -> Result<Product> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Tables::check_product(&product.name, product.price, product.stock)?;

        let stored = tables
            .products
            .get_mut(&product.id)
            .ok_or_else(|| anyhow!("Product {} not found", product.id))?;
        *stored = product.clone();
        Ok(product.clone())
    }

    async fn find_orders(&self, query: &OrderQuery) -> Result<Vec<Order>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|order| {
                let (customer, products) = tables.relations(order);
                query.filter.matches(order, customer, &products)
                    && query
                        .search_term()
                        .is_none_or(|term| order_search_matches(customer, &products, term))
            })
            .cloned()
            .collect();

        sort_records(&mut orders, &query.order_by);
        Ok(orders)
    }

    async fn insert_order(&self, row: NewOrder) -> Result<Order> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Tables::check_order(&row)?;
        if !tables.customers.contains_key(&row.customer_id) {
            bail!(
                "foreign key violation: customer {} does not exist",
                row.customer_id
            );
        }
        let product_ids: BTreeSet<i64> = row.product_ids.iter().copied().collect();
        if let Some(missing) = product_ids
            .iter()
            .find(|id| !tables.products.contains_key(id))
        {
            bail!("foreign key violation: product {} does not exist", missing);
        }

        let id = Tables::next_id(&mut tables.next_order_id);
        let order = Order {
            id,
            customer_id: row.customer_id,
            product_ids: product_ids.into_iter().collect(),
            total_amount: row.total_amount,
            order_date: row.order_date,
        };
        tables.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn clear(&self) -> Result<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        tables.orders.clear();
        tables.products.clear();
        tables.customers.clear();
        Ok(())
    }
}
