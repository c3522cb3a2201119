//! Shared test harness for storage backend testing
//!
//! Provides row builders for customers, products and orders, a small fixture
//! loader, and the `crm_store_tests!` contract suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod crm_store_tests;

use chrono::{DateTime, TimeZone, Utc};
use crm::core::entity::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product};
use crm::core::money;
use crm::core::store::CrmStore;
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Row builders
// ---------------------------------------------------------------------------

pub fn new_customer(name: &str, email: &str, phone: Option<&str>) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.map(String::from),
    }
}

pub fn amount(text: &str) -> Decimal {
    money::parse_amount(text).expect("test amount should parse")
}

pub fn new_product(name: &str, price: &str, stock: i32) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price: amount(price),
        stock,
    }
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn new_order(customer: &Customer, products: &[&Product], order_date: DateTime<Utc>) -> NewOrder {
    NewOrder {
        customer_id: customer.id,
        product_ids: products.iter().map(|p| p.id).collect(),
        total_amount: money::sum_prices(products.iter().map(|p| &p.price)),
        order_date,
    }
}

// ---------------------------------------------------------------------------
// Fixture set
// ---------------------------------------------------------------------------

/// Rows inserted by [`load_fixture`]
pub struct Fixture {
    pub alice: Customer,
    pub bob: Customer,
    pub carol: Customer,
    pub laptop: Product,
    pub mouse: Product,
    pub keyboard: Product,
    pub monitor: Product,
    /// Alice: laptop + mouse, 2024-03-10
    pub alice_order: Order,
    /// Bob: keyboard, 2024-03-01
    pub bob_order: Order,
}

pub async fn load_fixture(store: &dyn CrmStore) -> Fixture {
    let customers = store
        .insert_customers(vec![
            new_customer("Alice Johnson", "alice@example.com", Some("+1234567890")),
            new_customer("Bob Smith", "bob@example.com", Some("123-456-7890")),
            new_customer("Carol Davis", "carol@example.com", None),
        ])
        .await
        .expect("fixture customers");
    let [alice, bob, carol]: [Customer; 3] = customers.try_into().expect("three customers");

    let laptop = store.insert_product(new_product("Laptop", "999.99", 10)).await.unwrap();
    let mouse = store.insert_product(new_product("Mouse", "29.99", 50)).await.unwrap();
    let keyboard = store.insert_product(new_product("Keyboard", "79.99", 25)).await.unwrap();
    let monitor = store.insert_product(new_product("Monitor", "299.99", 5)).await.unwrap();

    let alice_order = store
        .insert_order(new_order(&alice, &[&laptop, &mouse], at(2024, 3, 10)))
        .await
        .unwrap();
    let bob_order = store
        .insert_order(new_order(&bob, &[&keyboard], at(2024, 3, 1)))
        .await
        .unwrap();

    Fixture {
        alice,
        bob,
        carol,
        laptop,
        mouse,
        keyboard,
        monitor,
        alice_order,
        bob_order,
    }
}

pub fn customer_names(customers: &[Customer]) -> Vec<&str> {
    customers.iter().map(|c| c.name.as_str()).collect()
}

pub fn product_names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

pub fn order_ids(orders: &[Order]) -> Vec<i64> {
    orders.iter().map(|o| o.id).collect()
}
