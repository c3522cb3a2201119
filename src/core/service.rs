//! Mutation handlers and read passthroughs over a `CrmStore`
//!
//! Every mutation runs validate, then persist. Validation problems are
//! returned as strings inside the outcome and never as `Err`; an `Err` from
//! these methods always means the store itself failed.

use crate::core::entity::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product};
use crate::core::filter::ProductFilter;
use crate::core::money;
use crate::core::query::{CustomerQuery, OrderQuery, ProductQuery};
use crate::core::store::CrmStore;
use crate::core::validation::{
    MAX_CUSTOMER_NAME_LENGTH, MAX_PRODUCT_NAME_LENGTH, STOCK_INCREMENT, fits_length,
    is_valid_email, is_valid_phone, validate_price, validate_stock, validate_total,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;

/// Customer fields as submitted by a client
#[derive(Debug, Clone, Default)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl CustomerInput {
    /// The phone number, with a blank value treated as absent
    fn phone(&self) -> Option<&str> {
        self.phone.as_deref().filter(|p| !p.is_empty())
    }

    fn into_row(self) -> NewCustomer {
        let phone = self.phone().map(String::from);
        NewCustomer {
            name: self.name,
            email: self.email,
            phone,
        }
    }
}

/// Product fields as submitted by a client
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub stock: Option<i32>,
}

/// Order fields as submitted by a client; ids are in their wire form
#[derive(Debug, Clone, Default)]
pub struct OrderInput {
    pub customer_id: String,
    pub product_ids: Vec<String>,
    pub order_date: Option<DateTime<Utc>>,
}

/// Result of a single-entity mutation
///
/// Exactly one of `value` and `errors` is populated.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: Option<T>,
    pub errors: Vec<String>,
}

impl<T> Outcome<T> {
    pub fn created(value: T) -> Self {
        Self {
            value: Some(value),
            errors: Vec::new(),
        }
    }

    pub fn rejected(errors: Vec<String>) -> Self {
        Self {
            value: None,
            errors,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.value.is_some()
    }
}

/// Result of a bulk customer import
#[derive(Debug, Clone, Default)]
pub struct BulkOutcome {
    pub customers: Vec<Customer>,
    /// One entry per skipped row, tagged `[Row N]`
    pub errors: Vec<String>,
}

/// Result of a restock run
#[derive(Debug, Clone)]
pub struct RestockOutcome {
    pub products: Vec<Product>,
    pub updated_at: DateTime<Utc>,
}

impl RestockOutcome {
    pub fn message(&self) -> String {
        format!(
            "{} products updated at {}",
            self.products.len(),
            self.updated_at.format("%Y-%m-%d %H:%M:%S%.6f%:z")
        )
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// The CRM operations shared by every surface (GraphQL, seeding, tools)
#[derive(Clone)]
pub struct CrmService {
    store: Arc<dyn CrmStore>,
}

impl CrmService {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CrmStore> {
        &self.store
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn customers(&self, query: &CustomerQuery) -> Result<Vec<Customer>> {
        self.store.find_customers(query).await
    }

    pub async fn customer(&self, id: i64) -> Result<Option<Customer>> {
        self.store.get_customer(id).await
    }

    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        self.store.find_products(query).await
    }

    pub async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>> {
        self.store.get_products(ids).await
    }

    pub async fn orders(&self, query: &OrderQuery) -> Result<Vec<Order>> {
        self.store.find_orders(query).await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create one customer; all validation errors are reported together
    pub async fn create_customer(&self, input: CustomerInput) -> Result<Outcome<Customer>> {
        let mut errors = Vec::new();

        if !fits_length(&input.name, MAX_CUSTOMER_NAME_LENGTH) {
            errors.push(format!(
                "Name cannot exceed {} characters.",
                MAX_CUSTOMER_NAME_LENGTH
            ));
        }
        if self.store.email_exists(&input.email).await? {
            errors.push("Email already exists.".to_string());
        }
        if !is_valid_email(&input.email) {
            errors.push("Invalid email format.".to_string());
        }
        if input.phone().is_some_and(|p| !is_valid_phone(p)) {
            errors.push("Invalid phone number format.".to_string());
        }

        if !errors.is_empty() {
            tracing::debug!(email = %input.email, ?errors, "customer rejected");
            return Ok(Outcome::rejected(errors));
        }

        let customer = self.store.insert_customer(input.into_row()).await?;
        tracing::info!(id = customer.id, "customer created");
        Ok(Outcome::created(customer))
    }

    /// Import customers row by row, committing every row that passes
    ///
    /// The first failing check of a row is reported and the row is skipped.
    /// Rows accepted earlier in the batch count when checking email
    /// uniqueness. Accepted rows are written in one transaction.
    pub async fn bulk_create_customers(&self, inputs: Vec<CustomerInput>) -> Result<BulkOutcome> {
        let mut rows = Vec::with_capacity(inputs.len());
        let mut errors = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (index, input) in inputs.into_iter().enumerate() {
            let row_number = index + 1;

            let error = if seen.contains(&input.email)
                || self.store.email_exists(&input.email).await?
            {
                Some(format!(
                    "[Row {}] Email '{}' already exists.",
                    row_number, input.email
                ))
            } else if !is_valid_email(&input.email) {
                Some(format!(
                    "[Row {}] Invalid email format for '{}'.",
                    row_number, input.name
                ))
            } else if input.phone().is_some_and(|p| !is_valid_phone(p)) {
                Some(format!(
                    "[Row {}] Invalid phone format for '{}'.",
                    row_number, input.name
                ))
            } else if !fits_length(&input.name, MAX_CUSTOMER_NAME_LENGTH) {
                Some(format!(
                    "[Row {}] Name cannot exceed {} characters.",
                    row_number, MAX_CUSTOMER_NAME_LENGTH
                ))
            } else {
                None
            };

            match error {
                Some(error) => {
                    tracing::warn!(row = row_number, %error, "skipping customer row");
                    errors.push(error);
                }
                None => {
                    seen.insert(input.email.clone());
                    rows.push(input.into_row());
                }
            }
        }

        let customers = if rows.is_empty() {
            Vec::new()
        } else {
            self.store.insert_customers(rows).await?
        };
        tracing::info!(
            created = customers.len(),
            skipped = errors.len(),
            "bulk customer import finished"
        );

        Ok(BulkOutcome { customers, errors })
    }

    /// Create one product; price is rounded to cents before validation
    pub async fn create_product(&self, input: ProductInput) -> Result<Outcome<Product>> {
        let mut errors = Vec::new();

        if !fits_length(&input.name, MAX_PRODUCT_NAME_LENGTH) {
            errors.push(format!(
                "Name cannot exceed {} characters.",
                MAX_PRODUCT_NAME_LENGTH
            ));
        }
        let price = match money::decimal_from_f64(input.price) {
            Some(price) => {
                let price = money::to_money(price);
                if let Err(e) = validate_price(price) {
                    errors.push(e);
                }
                price
            }
            None => {
                let message = if input.price > 0.0 {
                    format!("Price exceeds the maximum of {}.", money::max_amount())
                } else {
                    "Price must be positive.".to_string()
                };
                errors.push(message);
                Decimal::ZERO
            }
        };
        if let Err(e) = validate_stock(input.stock) {
            errors.push(e);
        }

        if !errors.is_empty() {
            tracing::debug!(name = %input.name, ?errors, "product rejected");
            return Ok(Outcome::rejected(errors));
        }

        let product = self
            .store
            .insert_product(NewProduct {
                name: input.name,
                price,
                stock: input.stock.unwrap_or(0),
            })
            .await?;
        tracing::info!(id = product.id, "product created");
        Ok(Outcome::created(product))
    }

    /// Create an order for an existing customer and a non-empty set of
    /// existing products; the total is the sum of their current prices
    pub async fn create_order(&self, input: OrderInput) -> Result<Outcome<Order>> {
        let customer = match parse_id(&input.customer_id) {
            Some(id) => self.store.get_customer(id).await?,
            None => None,
        };
        let Some(customer) = customer else {
            return Ok(Outcome::rejected(vec!["Invalid customer ID.".to_string()]));
        };

        if input.product_ids.is_empty() {
            return Ok(Outcome::rejected(vec![
                "At least one product ID must be provided.".to_string(),
            ]));
        }

        let ids: Option<Vec<i64>> = input.product_ids.iter().map(|raw| parse_id(raw)).collect();
        let products = match ids {
            Some(ids) => self.store.get_products(&ids).await?,
            None => Vec::new(),
        };
        // Duplicates collapse in the lookup, so they also fail this check
        if products.len() != input.product_ids.len() {
            return Ok(Outcome::rejected(vec![
                "Some product IDs are invalid.".to_string(),
            ]));
        }

        let total_amount = money::sum_prices(products.iter().map(|p| &p.price));
        if let Err(e) = validate_total(total_amount) {
            return Ok(Outcome::rejected(vec![e]));
        }
        let order = self
            .store
            .insert_order(NewOrder {
                customer_id: customer.id,
                product_ids: products.iter().map(|p| p.id).collect(),
                total_amount,
                order_date: input.order_date.unwrap_or_else(Utc::now),
            })
            .await?;
        tracing::info!(id = order.id, customer_id = customer.id, %total_amount, "order created");
        Ok(Outcome::created(order))
    }

    /// Add the restock increment to every product below the low-stock
    /// threshold
    pub async fn update_low_stock_products(&self) -> Result<RestockOutcome> {
        let low = self
            .store
            .find_products(&ProductQuery::filtered(ProductFilter::low_stock()))
            .await?;

        let mut products = Vec::with_capacity(low.len());
        for mut product in low {
            product.stock += STOCK_INCREMENT;
            products.push(self.store.update_product(&product).await?);
        }

        let outcome = RestockOutcome {
            products,
            updated_at: Utc::now(),
        };
        tracing::info!("{}", outcome.message());
        Ok(outcome)
    }
}
