//! Filter sets for the three entity collections
//!
//! Every field of a filter set is optional; an absent field imposes no
//! constraint and the present ones are AND-combined. The `matches` methods are
//! the reference semantics: the in-memory store calls them directly and the
//! PostgreSQL store translates the same fields into SQL predicates.

use crate::core::entity::{Customer, Order, Product};
use crate::core::validation::is_low_stock;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;

/// Case-insensitive substring match
pub fn icontains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Which end of an inclusive range a date bound closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

/// Parse a date or date-time bound
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00+02:00`), naive ISO date-times
/// (read as UTC, fractional seconds allowed) and plain dates. A plain date
/// used as a lower bound starts at midnight; as an upper bound it covers the
/// whole day.
pub fn parse_date_bound(text: &str, bound: Bound) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    let time = match bound {
        Bound::Lower => NaiveTime::MIN,
        Bound::Upper => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)?,
    };
    Some(date.and_time(time).and_utc())
}

fn within<T: PartialOrd>(value: &T, gte: Option<&T>, lte: Option<&T>) -> bool {
    gte.is_none_or(|min| value >= min) && lte.is_none_or(|max| value <= max)
}

/// Filters over customers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilter {
    /// Name contains (case-insensitive)
    pub name: Option<String>,
    /// Email contains (case-insensitive)
    pub email: Option<String>,
    pub created_at_gte: Option<DateTime<Utc>>,
    pub created_at_lte: Option<DateTime<Utc>>,
    /// Phone starts with this prefix (e.g. `+1`)
    pub phone_pattern: Option<String>,
}

impl CustomerFilter {
    pub fn matches(&self, customer: &Customer) -> bool {
        self.name.as_deref().is_none_or(|n| icontains(&customer.name, n))
            && self
                .email
                .as_deref()
                .is_none_or(|e| icontains(&customer.email, e))
            && within(
                &customer.created_at,
                self.created_at_gte.as_ref(),
                self.created_at_lte.as_ref(),
            )
            && self.phone_pattern.as_deref().is_none_or(|prefix| {
                customer
                    .phone
                    .as_deref()
                    .unwrap_or_default()
                    .starts_with(prefix)
            })
    }
}

/// Filters over products
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
    /// When set, keep only products below the restock threshold
    pub low_stock: bool,
}

impl ProductFilter {
    /// The selection used by the restock mutation
    pub fn low_stock() -> Self {
        Self {
            low_stock: true,
            ..Self::default()
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.name.as_deref().is_none_or(|n| icontains(&product.name, n))
            && within(
                &product.price,
                self.price_gte.as_ref(),
                self.price_lte.as_ref(),
            )
            && within(
                &product.stock,
                self.stock_gte.as_ref(),
                self.stock_lte.as_ref(),
            )
            && (!self.low_stock || is_low_stock(product.stock))
    }
}

/// Filters over orders, including predicates across the customer and
/// product relations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub total_amount_gte: Option<Decimal>,
    pub total_amount_lte: Option<Decimal>,
    pub order_date_gte: Option<DateTime<Utc>>,
    pub order_date_lte: Option<DateTime<Utc>>,
    /// The owning customer's name contains (case-insensitive)
    pub customer_name: Option<String>,
    /// Any associated product's name contains (case-insensitive)
    pub product_name: Option<String>,
    /// The order contains this product
    pub product_id: Option<i64>,
}

impl OrderFilter {
    /// `customer` and `products` are the order's resolved relations
    pub fn matches(&self, order: &Order, customer: Option<&Customer>, products: &[&Product]) -> bool {
        within(
            &order.total_amount,
            self.total_amount_gte.as_ref(),
            self.total_amount_lte.as_ref(),
        ) && within(
            &order.order_date,
            self.order_date_gte.as_ref(),
            self.order_date_lte.as_ref(),
        ) && self
            .customer_name
            .as_deref()
            .is_none_or(|n| customer.is_some_and(|c| icontains(&c.name, n)))
            && self
                .product_name
                .as_deref()
                .is_none_or(|n| products.iter().any(|p| icontains(&p.name, n)))
            && self
                .product_id
                .is_none_or(|id| order.product_ids.contains(&id))
    }
}

/// Free-text search over customers: name, email or phone contains the term
pub fn customer_search_matches(customer: &Customer, term: &str) -> bool {
    icontains(&customer.name, term)
        || icontains(&customer.email, term)
        || customer.phone.as_deref().is_some_and(|p| icontains(p, term))
}

/// Free-text search over products: name contains the term
pub fn product_search_matches(product: &Product, term: &str) -> bool {
    icontains(&product.name, term)
}

/// Free-text search over orders: the customer's name or any product's name
/// contains the term
pub fn order_search_matches(customer: Option<&Customer>, products: &[&Product], term: &str) -> bool {
    customer.is_some_and(|c| icontains(&c.name, term))
        || products.iter().any(|p| icontains(&p.name, term))
}
