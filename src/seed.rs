//! Sample data set for development and demos

use crate::core::entity::{Customer, NewCustomer, NewOrder, NewProduct, Product};
use crate::core::money;
use crate::core::store::CrmStore;
use anyhow::{Result, anyhow};
use chrono::Utc;

const CUSTOMERS: &[(&str, &str, Option<&str>)] = &[
    ("Alice Johnson", "alice@example.com", Some("+1234567890")),
    ("Bob Smith", "bob@example.com", Some("123-456-7890")),
    ("Carol Davis", "carol@example.com", Some("+447700900123")),
    ("David Wilson", "david@example.com", None),
];

const PRODUCTS: &[(&str, &str, i32)] = &[
    ("Laptop", "999.99", 10),
    ("Mouse", "29.99", 50),
    ("Keyboard", "79.99", 25),
    ("Monitor", "299.99", 5),
    ("Headphones", "149.99", 15),
];

/// Customer email, then the names of the products ordered
const ORDERS: &[(&str, &[&str])] = &[
    ("alice@example.com", &["Laptop", "Mouse"]),
    ("bob@example.com", &["Keyboard"]),
];

/// What a seeding run inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
}

fn find_customer<'a>(customers: &'a [Customer], email: &str) -> Result<&'a Customer> {
    customers
        .iter()
        .find(|c| c.email == email)
        .ok_or_else(|| anyhow!("Seed customer {} missing", email))
}

fn find_product<'a>(products: &'a [Product], name: &str) -> Result<&'a Product> {
    products
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| anyhow!("Seed product {} missing", name))
}

/// Delete every row, then insert the sample customers, products and orders
///
/// Order totals are the sums of the seeded prices.
pub async fn seed_database(store: &dyn CrmStore) -> Result<SeedSummary> {
    store.clear().await?;

    let customers = store
        .insert_customers(
            CUSTOMERS
                .iter()
                .map(|(name, email, phone)| NewCustomer {
                    name: name.to_string(),
                    email: email.to_string(),
                    phone: phone.map(String::from),
                })
                .collect(),
        )
        .await?;

    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (name, price, stock) in PRODUCTS {
        let price =
            money::parse_amount(price).ok_or_else(|| anyhow!("Invalid seed price {}", price))?;
        products.push(
            store
                .insert_product(NewProduct {
                    name: name.to_string(),
                    price,
                    stock: *stock,
                })
                .await?,
        );
    }

    let mut orders = 0;
    for (email, product_names) in ORDERS {
        let customer = find_customer(&customers, email)?;
        let ordered = product_names
            .iter()
            .map(|name| find_product(&products, name))
            .collect::<Result<Vec<_>>>()?;

        store
            .insert_order(NewOrder {
                customer_id: customer.id,
                product_ids: ordered.iter().map(|p| p.id).collect(),
                total_amount: money::sum_prices(ordered.iter().map(|p| &p.price)),
                order_date: Utc::now(),
            })
            .await?;
        orders += 1;
    }

    let summary = SeedSummary {
        customers: customers.len(),
        products: products.len(),
        orders,
    };
    tracing::info!(
        customers = summary.customers,
        products = summary.products,
        orders = summary.orders,
        "database seeded"
    );
    Ok(summary)
}
