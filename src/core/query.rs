//! List queries: filter set, free-text search and sort keys
//!
//! # Ordering
//!
//! `orderBy` takes field names in `snake_case` or `camelCase`; a leading `-`
//! sorts that key descending. Keys apply in the order given and the record id
//! (ascending) is always the final tie-break, so pagination cursors stay
//! stable between requests.
//!
//! ```text
//! orderBy: ["-created_at", "name"]
//! orderBy: ["totalAmount"]
//! ```

use crate::core::entity::{Customer, Order, Product};
use crate::core::error::{CrmError, QueryError};
use crate::core::filter::{CustomerFilter, OrderFilter, ProductFilter};
use std::cmp::Ordering;

/// A field an entity collection can be sorted by
pub trait SortField: Copy + Send + Sync + 'static {
    /// Entity name used in error messages
    const ENTITY: &'static str;

    /// Every sortable field, by canonical (snake_case) name
    const FIELDS: &'static [(&'static str, Self)];

    /// SQL expression for this field
    fn column(self) -> &'static str;

    fn parse(name: &str) -> Option<Self> {
        let snake = to_snake_case(name);
        Self::FIELDS
            .iter()
            .find(|(canonical, _)| *canonical == snake)
            .map(|(_, field)| *field)
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL direction, with NULLs placed the way `Option` orders them
    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC NULLS FIRST",
            SortDirection::Desc => "DESC NULLS LAST",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey<F> {
    pub field: F,
    pub direction: SortDirection,
}

/// Parse an `orderBy` argument into sort keys
pub fn parse_order_by<F: SortField>(raw: &[String]) -> Result<Vec<SortKey<F>>, CrmError> {
    raw.iter()
        .map(|entry| {
            let entry = entry.trim();
            let (direction, name) = match entry.strip_prefix('-') {
                Some(rest) => (SortDirection::Desc, rest),
                None => (SortDirection::Asc, entry),
            };
            F::parse(name)
                .map(|field| SortKey { field, direction })
                .ok_or_else(|| {
                    QueryError::UnknownSortField {
                        entity_type: F::ENTITY.to_string(),
                        field: entry.to_string(),
                        allowed: F::FIELDS.iter().map(|(name, _)| *name).collect(),
                    }
                    .into()
                })
        })
        .collect()
}

/// Records that can be ordered by their sort fields
pub trait Sortable<F> {
    fn id(&self) -> i64;
    fn compare_field(&self, other: &Self, field: F) -> Ordering;
}

/// Sort records in place by the given keys, then by id
pub fn sort_records<T: Sortable<F>, F: Copy>(records: &mut [T], keys: &[SortKey<F>]) {
    records.sort_by(|a, b| {
        keys.iter()
            .map(|key| key.direction.apply(a.compare_field(b, key.field)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.id().cmp(&b.id()))
    });
}

// =============================================================================
// Sortable fields per entity
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Id,
    Name,
    Email,
    Phone,
    CreatedAt,
}

impl SortField for CustomerField {
    const ENTITY: &'static str = "customers";
    const FIELDS: &'static [(&'static str, Self)] = &[
        ("id", Self::Id),
        ("name", Self::Name),
        ("email", Self::Email),
        ("phone", Self::Phone),
        ("created_at", Self::CreatedAt),
    ];

    fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::CreatedAt => "created_at",
        }
    }
}

impl Sortable<CustomerField> for Customer {
    fn id(&self) -> i64 {
        self.id
    }

    fn compare_field(&self, other: &Self, field: CustomerField) -> Ordering {
        match field {
            CustomerField::Id => self.id.cmp(&other.id),
            CustomerField::Name => self.name.cmp(&other.name),
            CustomerField::Email => self.email.cmp(&other.email),
            CustomerField::Phone => self.phone.cmp(&other.phone),
            CustomerField::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Id,
    Name,
    Price,
    Stock,
}

impl SortField for ProductField {
    const ENTITY: &'static str = "products";
    const FIELDS: &'static [(&'static str, Self)] = &[
        ("id", Self::Id),
        ("name", Self::Name),
        ("price", Self::Price),
        ("stock", Self::Stock),
    ];

    fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Price => "price",
            Self::Stock => "stock",
        }
    }
}

impl Sortable<ProductField> for Product {
    fn id(&self) -> i64 {
        self.id
    }

    fn compare_field(&self, other: &Self, field: ProductField) -> Ordering {
        match field {
            ProductField::Id => self.id.cmp(&other.id),
            ProductField::Name => self.name.cmp(&other.name),
            ProductField::Price => self.price.cmp(&other.price),
            ProductField::Stock => self.stock.cmp(&other.stock),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Id,
    Customer,
    TotalAmount,
    OrderDate,
}

impl SortField for OrderField {
    const ENTITY: &'static str = "orders";
    const FIELDS: &'static [(&'static str, Self)] = &[
        ("id", Self::Id),
        ("customer", Self::Customer),
        ("total_amount", Self::TotalAmount),
        ("order_date", Self::OrderDate),
    ];

    fn column(self) -> &'static str {
        match self {
            Self::Id => "o.id",
            Self::Customer => "o.customer_id",
            Self::TotalAmount => "o.total_amount",
            Self::OrderDate => "o.order_date",
        }
    }
}

impl Sortable<OrderField> for Order {
    fn id(&self) -> i64 {
        self.id
    }

    fn compare_field(&self, other: &Self, field: OrderField) -> Ordering {
        match field {
            OrderField::Id => self.id.cmp(&other.id),
            OrderField::Customer => self.customer_id.cmp(&other.customer_id),
            OrderField::TotalAmount => self.total_amount.cmp(&other.total_amount),
            OrderField::OrderDate => self.order_date.cmp(&other.order_date),
        }
    }
}

// =============================================================================
// List queries
// =============================================================================

/// A read over one entity collection
#[derive(Debug, Clone)]
pub struct ListQuery<F, S> {
    pub filter: F,
    /// Free-text search, OR-ed over the entity's search fields
    pub search: Option<String>,
    pub order_by: Vec<SortKey<S>>,
}

impl<F: Default, S> Default for ListQuery<F, S> {
    fn default() -> Self {
        Self {
            filter: F::default(),
            search: None,
            order_by: Vec::new(),
        }
    }
}

impl<F, S> ListQuery<F, S> {
    pub fn filtered(filter: F) -> Self {
        Self {
            filter,
            search: None,
            order_by: Vec::new(),
        }
    }

    /// The search term, if one was given and is not blank
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

pub type CustomerQuery = ListQuery<CustomerFilter, CustomerField>;
pub type ProductQuery = ListQuery<ProductFilter, ProductField>;
pub type OrderQuery = ListQuery<OrderFilter, OrderField>;
