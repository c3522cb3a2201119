//! GraphQL object, input and payload types

use crate::core::entity::{Customer, Order, Product};
use crate::core::filter::{Bound, CustomerFilter, OrderFilter, ProductFilter, parse_date_bound};
use crate::core::money;
use crate::core::service::{self, CrmService};
use async_graphql::{Context, ID, InputObject, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

fn wire_id(id: i64) -> ID {
    ID(id.to_string())
}

// =============================================================================
// Object types
// =============================================================================

pub struct CustomerType(pub Customer);

#[Object]
impl CustomerType {
    async fn id(&self) -> ID {
        wire_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn phone(&self) -> Option<&str> {
        self.0.phone.as_deref()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }
}

pub struct ProductType(pub Product);

#[Object]
impl ProductType {
    async fn id(&self) -> ID {
        wire_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn price(&self) -> Decimal {
        self.0.price
    }

    async fn stock(&self) -> i32 {
        self.0.stock
    }
}

pub struct OrderType(pub Order);

#[Object]
impl OrderType {
    async fn id(&self) -> ID {
        wire_id(self.0.id)
    }

    async fn customer(&self, ctx: &Context<'_>) -> Result<CustomerType> {
        let service = ctx.data::<CrmService>()?;
        let customer = service
            .customer(self.0.customer_id)
            .await?
            .ok_or_else(|| format!("Customer {} not found", self.0.customer_id))?;
        Ok(CustomerType(customer))
    }

    async fn products(&self, ctx: &Context<'_>) -> Result<Vec<ProductType>> {
        let service = ctx.data::<CrmService>()?;
        let products = service.products_by_ids(&self.0.product_ids).await?;
        Ok(products.into_iter().map(ProductType).collect())
    }

    async fn total_amount(&self) -> Decimal {
        self.0.total_amount
    }

    async fn order_date(&self) -> DateTime<Utc> {
        self.0.order_date
    }
}

// =============================================================================
// Mutation inputs
// =============================================================================

#[derive(InputObject)]
#[graphql(name = "CustomerInput")]
pub struct CustomerInputObject {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<CustomerInputObject> for service::CustomerInput {
    fn from(input: CustomerInputObject) -> Self {
        Self {
            name: input.name,
            email: input.email,
            phone: input.phone,
        }
    }
}

#[derive(InputObject)]
#[graphql(name = "ProductInput")]
pub struct ProductInputObject {
    pub name: String,
    pub price: f64,
    pub stock: Option<i32>,
}

impl From<ProductInputObject> for service::ProductInput {
    fn from(input: ProductInputObject) -> Self {
        Self {
            name: input.name,
            price: input.price,
            stock: input.stock,
        }
    }
}

#[derive(InputObject)]
#[graphql(name = "OrderInput")]
pub struct OrderInputObject {
    pub customer_id: ID,
    pub product_ids: Vec<ID>,
    pub order_date: Option<DateTime<Utc>>,
}

impl From<OrderInputObject> for service::OrderInput {
    fn from(input: OrderInputObject) -> Self {
        Self {
            customer_id: input.customer_id.0,
            product_ids: input.product_ids.into_iter().map(|id| id.0).collect(),
            order_date: input.order_date,
        }
    }
}

// =============================================================================
// Filter inputs
// =============================================================================

/// Parse a date bound, logging and dropping values that do not parse
fn date_bound(field: &str, value: Option<String>, bound: Bound) -> Option<DateTime<Utc>> {
    let text = value?;
    let parsed = parse_date_bound(&text, bound);
    if parsed.is_none() {
        tracing::warn!(field, value = %text, "ignoring unparseable date filter");
    }
    parsed
}

/// Convert a float bound to an exact decimal, logging and dropping NaN/inf
fn amount_bound(field: &str, value: Option<f64>) -> Option<Decimal> {
    let value = value?;
    let parsed = money::decimal_from_f64(value);
    if parsed.is_none() {
        tracing::warn!(field, value, "ignoring unrepresentable amount filter");
    }
    parsed
}

#[derive(InputObject, Default)]
pub struct CustomerFilterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at_gte: Option<String>,
    pub created_at_lte: Option<String>,
    pub phone_pattern: Option<String>,
}

impl From<CustomerFilterInput> for CustomerFilter {
    fn from(input: CustomerFilterInput) -> Self {
        Self {
            name: input.name,
            email: input.email,
            created_at_gte: date_bound("createdAtGte", input.created_at_gte, Bound::Lower),
            created_at_lte: date_bound("createdAtLte", input.created_at_lte, Bound::Upper),
            phone_pattern: input.phone_pattern,
        }
    }
}

#[derive(InputObject, Default)]
pub struct ProductFilterInput {
    pub name: Option<String>,
    pub price_gte: Option<f64>,
    pub price_lte: Option<f64>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
    /// Only products with stock below 10
    pub low_stock: Option<bool>,
}

impl From<ProductFilterInput> for ProductFilter {
    fn from(input: ProductFilterInput) -> Self {
        Self {
            name: input.name,
            price_gte: amount_bound("priceGte", input.price_gte),
            price_lte: amount_bound("priceLte", input.price_lte),
            stock_gte: input.stock_gte,
            stock_lte: input.stock_lte,
            low_stock: input.low_stock.unwrap_or(false),
        }
    }
}

#[derive(InputObject, Default)]
pub struct OrderFilterInput {
    pub total_amount_gte: Option<f64>,
    pub total_amount_lte: Option<f64>,
    pub order_date_gte: Option<String>,
    pub order_date_lte: Option<String>,
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub product_id: Option<ID>,
}

impl From<OrderFilterInput> for OrderFilter {
    fn from(input: OrderFilterInput) -> Self {
        let product_id = input.product_id.and_then(|id| {
            let parsed = id.0.trim().parse().ok();
            if parsed.is_none() {
                tracing::warn!(value = %id.0, "ignoring unparseable productId filter");
            }
            parsed
        });
        Self {
            total_amount_gte: amount_bound("totalAmountGte", input.total_amount_gte),
            total_amount_lte: amount_bound("totalAmountLte", input.total_amount_lte),
            order_date_gte: date_bound("orderDateGte", input.order_date_gte, Bound::Lower),
            order_date_lte: date_bound("orderDateLte", input.order_date_lte, Bound::Upper),
            customer_name: input.customer_name,
            product_name: input.product_name,
            product_id,
        }
    }
}

// =============================================================================
// Mutation payloads
// =============================================================================

#[derive(SimpleObject)]
pub struct CreateCustomer {
    pub customer: Option<CustomerType>,
    pub message: String,
    pub errors: Vec<String>,
}

#[derive(SimpleObject)]
pub struct BulkCreateCustomers {
    pub customers: Vec<CustomerType>,
    pub errors: Vec<String>,
}

#[derive(SimpleObject)]
pub struct CreateProduct {
    pub product: Option<ProductType>,
    pub errors: Vec<String>,
}

#[derive(SimpleObject)]
pub struct CreateOrder {
    pub order: Option<OrderType>,
    pub errors: Vec<String>,
}

#[derive(SimpleObject)]
pub struct UpdateLowStockProducts {
    pub success: bool,
    pub message: String,
    pub updated_products: Vec<ProductType>,
    /// Number of restocked products
    pub count: usize,
}
