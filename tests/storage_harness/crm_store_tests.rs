//! Macro-generated test suite for `CrmStore` contract validation.
//!
//! The `crm_store_tests!` macro generates a test module that validates any
//! `CrmStore` implementation against the full contract: inserts and lookups,
//! table constraints, atomic writes, every filter field, search, ordering and
//! concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use crm::storage::InMemoryCrmStore;
//!
//! crm_store_tests!(InMemoryCrmStore::new());
//! ```

/// Generate a full `CrmStore` conformance test suite.
///
/// `$factory` must be an expression that evaluates to an empty store. It is
/// re-evaluated for each test to ensure isolation. For the concurrent access
/// test, the returned store must also implement `Clone + 'static`.
#[macro_export]
macro_rules! crm_store_tests {
    ($factory:expr) => {
        mod crm_store_contract_tests {
            use super::*;
            use crm::core::filter::{
                Bound, CustomerFilter, OrderFilter, ProductFilter, parse_date_bound,
            };
            use crm::core::query::{
                CustomerField, CustomerQuery, OrderField, OrderQuery, ProductField,
                ProductQuery, SortDirection, SortKey,
            };
            use crm::core::store::CrmStore;

            // ==================================================================
            // Customers
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_get_customer() {
                let store = $factory;
                let created = store
                    .insert_customer(new_customer("Alice Johnson", "alice@example.com", Some("+1234567890")))
                    .await
                    .unwrap();
                assert_eq!(created.name, "Alice Johnson");
                assert_eq!(created.phone.as_deref(), Some("+1234567890"));

                let fetched = store.get_customer(created.id).await.unwrap();
                assert_eq!(fetched, Some(created));
            }

            #[tokio::test]
            async fn test_get_missing_customer() {
                let store = $factory;
                assert!(store.get_customer(424242).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_batch_insert_keeps_input_order() {
                let store = $factory;
                let created = store
                    .insert_customers(vec![
                        new_customer("Zed", "zed@example.com", None),
                        new_customer("Amy", "amy@example.com", None),
                    ])
                    .await
                    .unwrap();
                assert_eq!(customer_names(&created), vec!["Zed", "Amy"]);
                assert!(created[0].id < created[1].id);
            }

            #[tokio::test]
            async fn test_email_exists_is_exact() {
                let store = $factory;
                store
                    .insert_customer(new_customer("Alice", "alice@example.com", None))
                    .await
                    .unwrap();
                assert!(store.email_exists("alice@example.com").await.unwrap());
                assert!(!store.email_exists("alice@example").await.unwrap());
            }

            #[tokio::test]
            async fn test_duplicate_email_rejected() {
                let store = $factory;
                store
                    .insert_customer(new_customer("Alice", "alice@example.com", None))
                    .await
                    .unwrap();
                let second = store
                    .insert_customer(new_customer("Alice Again", "alice@example.com", None))
                    .await;
                assert!(second.is_err(), "unique email must be enforced by the store");

                let all = store.find_customers(&CustomerQuery::default()).await.unwrap();
                assert_eq!(all.len(), 1);
            }

            #[tokio::test]
            async fn test_failed_batch_writes_nothing() {
                let store = $factory;
                let result = store
                    .insert_customers(vec![
                        new_customer("One", "one@example.com", None),
                        new_customer("Two", "one@example.com", None),
                    ])
                    .await;
                assert!(result.is_err());
                assert!(!store.email_exists("one@example.com").await.unwrap());
            }

            #[tokio::test]
            async fn test_bad_phone_rejected() {
                let store = $factory;
                let result = store
                    .insert_customer(new_customer("Bad", "bad@example.com", Some("12-34")))
                    .await;
                assert!(result.is_err());
            }

            #[tokio::test]
            async fn test_customer_column_limits() {
                let store = $factory;
                let longest_name = "n".repeat(100);
                let created = store
                    .insert_customer(new_customer(&longest_name, "fits@example.com", None))
                    .await
                    .unwrap();
                assert_eq!(created.name, longest_name);

                let long_name = "n".repeat(101);
                assert!(store
                    .insert_customer(new_customer(&long_name, "long@example.com", None))
                    .await
                    .is_err());

                let long_email = format!("{}@example.com", "e".repeat(250));
                assert!(store
                    .insert_customer(new_customer("Long Email", &long_email, None))
                    .await
                    .is_err());

                let customers = store.find_customers(&CustomerQuery::default()).await.unwrap();
                assert_eq!(customer_names(&customers), vec![longest_name.as_str()]);
            }

            #[tokio::test]
            async fn test_customer_filters() {
                let store = $factory;
                let f = load_fixture(&store).await;

                let by_name = CustomerQuery::filtered(CustomerFilter {
                    name: Some("SMITH".to_string()),
                    ..Default::default()
                });
                let found = store.find_customers(&by_name).await.unwrap();
                assert_eq!(customer_names(&found), vec!["Bob Smith"]);

                let by_email = CustomerQuery::filtered(CustomerFilter {
                    email: Some("carol@".to_string()),
                    ..Default::default()
                });
                let found = store.find_customers(&by_email).await.unwrap();
                assert_eq!(found[0].id, f.carol.id);

                let by_phone = CustomerQuery::filtered(CustomerFilter {
                    phone_pattern: Some("+1".to_string()),
                    ..Default::default()
                });
                let found = store.find_customers(&by_phone).await.unwrap();
                assert_eq!(customer_names(&found), vec!["Alice Johnson"]);

                let created_before_2000 = CustomerQuery::filtered(CustomerFilter {
                    created_at_lte: parse_date_bound("2000-01-01", Bound::Upper),
                    ..Default::default()
                });
                assert!(store.find_customers(&created_before_2000).await.unwrap().is_empty());

                let created_since_2000 = CustomerQuery::filtered(CustomerFilter {
                    created_at_gte: parse_date_bound("2000-01-01", Bound::Lower),
                    ..Default::default()
                });
                assert_eq!(store.find_customers(&created_since_2000).await.unwrap().len(), 3);
            }

            #[tokio::test]
            async fn test_customer_search_and_filter_compose() {
                let store = $factory;
                load_fixture(&store).await;

                let by_phone_digits = CustomerQuery {
                    search: Some("456-7890".to_string()),
                    ..Default::default()
                };
                let found = store.find_customers(&by_phone_digits).await.unwrap();
                assert_eq!(customer_names(&found), vec!["Bob Smith"]);

                let search_and_filter = CustomerQuery {
                    filter: CustomerFilter {
                        name: Some("alice".to_string()),
                        ..Default::default()
                    },
                    search: Some("example.com".to_string()),
                    order_by: vec![],
                };
                let found = store.find_customers(&search_and_filter).await.unwrap();
                assert_eq!(customer_names(&found), vec!["Alice Johnson"]);
            }

            #[tokio::test]
            async fn test_customer_ordering() {
                let store = $factory;
                load_fixture(&store).await;

                let query = CustomerQuery {
                    order_by: vec![SortKey {
                        field: CustomerField::Name,
                        direction: SortDirection::Desc,
                    }],
                    ..Default::default()
                };
                let found = store.find_customers(&query).await.unwrap();
                assert_eq!(
                    customer_names(&found),
                    vec!["Carol Davis", "Bob Smith", "Alice Johnson"]
                );

                let default_order = store.find_customers(&CustomerQuery::default()).await.unwrap();
                assert_eq!(
                    customer_names(&default_order),
                    vec!["Alice Johnson", "Bob Smith", "Carol Davis"]
                );
            }

            // ==================================================================
            // Products
            // ==================================================================

            #[tokio::test]
            async fn test_product_constraints() {
                let store = $factory;
                assert!(store.insert_product(new_product("Free", "0.00", 1)).await.is_err());
                assert!(store.insert_product(new_product("Owed", "-5.00", 1)).await.is_err());
                assert!(store.insert_product(new_product("Short", "5.00", -1)).await.is_err());
                assert!(store.find_products(&ProductQuery::default()).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_product_column_limits() {
                let store = $factory;
                assert!(store
                    .insert_product(new_product(&"p".repeat(256), "5.00", 1))
                    .await
                    .is_err());
                assert!(store
                    .insert_product(new_product("Too Dear", "100000000.00", 1))
                    .await
                    .is_err());
                let dearest = store
                    .insert_product(new_product("Dearest", "99999999.99", 1))
                    .await
                    .unwrap();
                assert_eq!(dearest.price.to_string(), "99999999.99");
            }

            #[tokio::test]
            async fn test_product_price_is_exact() {
                let store = $factory;
                let created = store
                    .insert_product(new_product("Mouse", "29.99", 50))
                    .await
                    .unwrap();
                assert_eq!(created.price.to_string(), "29.99");
            }

            #[tokio::test]
            async fn test_product_filters() {
                let store = $factory;
                load_fixture(&store).await;

                let mid_range = ProductQuery::filtered(ProductFilter {
                    price_gte: Some(amount("29.99")),
                    price_lte: Some(amount("299.99")),
                    ..Default::default()
                });
                let found = store.find_products(&mid_range).await.unwrap();
                assert_eq!(product_names(&found), vec!["Mouse", "Keyboard", "Monitor"]);

                let stocked = ProductQuery::filtered(ProductFilter {
                    stock_gte: Some(25),
                    ..Default::default()
                });
                let found = store.find_products(&stocked).await.unwrap();
                assert_eq!(product_names(&found), vec!["Mouse", "Keyboard"]);

                let low = store
                    .find_products(&ProductQuery::filtered(ProductFilter::low_stock()))
                    .await
                    .unwrap();
                assert_eq!(product_names(&low), vec!["Monitor"]);

                let by_name = ProductQuery {
                    search: Some("BOARD".to_string()),
                    ..Default::default()
                };
                let found = store.find_products(&by_name).await.unwrap();
                assert_eq!(product_names(&found), vec!["Keyboard"]);
            }

            #[tokio::test]
            async fn test_product_ordering_with_tie_break() {
                let store = $factory;
                let a = store.insert_product(new_product("Cable", "5.00", 3)).await.unwrap();
                let b = store.insert_product(new_product("Plug", "5.00", 3)).await.unwrap();
                let c = store.insert_product(new_product("Dock", "50.00", 3)).await.unwrap();

                let query = ProductQuery {
                    order_by: vec![SortKey {
                        field: ProductField::Price,
                        direction: SortDirection::Desc,
                    }],
                    ..Default::default()
                };
                let found = store.find_products(&query).await.unwrap();
                let ids: Vec<i64> = found.iter().map(|p| p.id).collect();
                assert_eq!(ids, vec![c.id, a.id, b.id]);
            }

            #[tokio::test]
            async fn test_get_products_dedups_and_sorts() {
                let store = $factory;
                let f = load_fixture(&store).await;

                let found = store
                    .get_products(&[f.mouse.id, f.laptop.id, f.mouse.id, 987654])
                    .await
                    .unwrap();
                assert_eq!(product_names(&found), vec!["Laptop", "Mouse"]);
            }

            #[tokio::test]
            async fn test_update_product() {
                let store = $factory;
                let f = load_fixture(&store).await;

                let mut monitor = f.monitor.clone();
                monitor.stock += 10;
                let updated = store.update_product(&monitor).await.unwrap();
                assert_eq!(updated.stock, 15);

                let fetched = store.get_products(&[monitor.id]).await.unwrap();
                assert_eq!(fetched[0].stock, 15);
            }

            #[tokio::test]
            async fn test_update_missing_product() {
                let store = $factory;
                let ghost = crm::core::entity::Product {
                    id: 987654,
                    name: "Ghost".to_string(),
                    price: amount("1.00"),
                    stock: 1,
                };
                assert!(store.update_product(&ghost).await.is_err());
            }

            // ==================================================================
            // Orders
            // ==================================================================

            #[tokio::test]
            async fn test_order_round_trip() {
                let store = $factory;
                let f = load_fixture(&store).await;

                assert_eq!(f.alice_order.customer_id, f.alice.id);
                assert_eq!(f.alice_order.total_amount.to_string(), "1029.98");

                let orders = store.find_orders(&OrderQuery::default()).await.unwrap();
                assert_eq!(order_ids(&orders), vec![f.alice_order.id, f.bob_order.id]);
                assert_eq!(orders[0].product_ids, vec![f.laptop.id, f.mouse.id]);
                assert_eq!(orders[0].order_date, at(2024, 3, 10));
                assert_eq!(orders[1].product_ids, vec![f.keyboard.id]);
            }

            #[tokio::test]
            async fn test_order_requires_customer_and_products() {
                let store = $factory;
                let f = load_fixture(&store).await;

                let mut orphan = new_order(&f.alice, &[&f.mouse], at(2024, 3, 5));
                orphan.customer_id = 987654;
                assert!(store.insert_order(orphan).await.is_err());

                let mut ghost_product = new_order(&f.alice, &[&f.mouse], at(2024, 3, 5));
                ghost_product.product_ids.push(987654);
                assert!(store.insert_order(ghost_product).await.is_err());

                let orders = store.find_orders(&OrderQuery::default()).await.unwrap();
                assert_eq!(orders.len(), 2, "failed inserts must not leave rows behind");
            }

            #[tokio::test]
            async fn test_order_total_must_fit_money_column() {
                let store = $factory;
                let f = load_fixture(&store).await;

                let mut overflowing = new_order(&f.alice, &[&f.mouse], at(2024, 3, 5));
                overflowing.total_amount = amount("199999999.98");
                assert!(store.insert_order(overflowing).await.is_err());

                let mut largest = new_order(&f.alice, &[&f.mouse], at(2024, 3, 5));
                largest.total_amount = amount("99999999.99");
                let created = store.insert_order(largest).await.unwrap();
                assert_eq!(created.total_amount.to_string(), "99999999.99");

                let orders = store.find_orders(&OrderQuery::default()).await.unwrap();
                assert_eq!(orders.len(), 3);
            }

            #[tokio::test]
            async fn test_order_filters() {
                let store = $factory;
                let f = load_fixture(&store).await;

                let expensive = OrderQuery::filtered(OrderFilter {
                    total_amount_gte: Some(amount("100.00")),
                    ..Default::default()
                });
                let found = store.find_orders(&expensive).await.unwrap();
                assert_eq!(order_ids(&found), vec![f.alice_order.id]);

                let recent = OrderQuery::filtered(OrderFilter {
                    order_date_gte: parse_date_bound("2024-03-05", Bound::Lower),
                    ..Default::default()
                });
                let found = store.find_orders(&recent).await.unwrap();
                assert_eq!(order_ids(&found), vec![f.alice_order.id]);

                let on_first = OrderQuery::filtered(OrderFilter {
                    order_date_gte: parse_date_bound("2024-03-01", Bound::Lower),
                    order_date_lte: parse_date_bound("2024-03-01", Bound::Upper),
                    ..Default::default()
                });
                let found = store.find_orders(&on_first).await.unwrap();
                assert_eq!(order_ids(&found), vec![f.bob_order.id]);

                let by_customer = OrderQuery::filtered(OrderFilter {
                    customer_name: Some("bob".to_string()),
                    ..Default::default()
                });
                let found = store.find_orders(&by_customer).await.unwrap();
                assert_eq!(order_ids(&found), vec![f.bob_order.id]);

                let by_product_name = OrderQuery::filtered(OrderFilter {
                    product_name: Some("mou".to_string()),
                    ..Default::default()
                });
                let found = store.find_orders(&by_product_name).await.unwrap();
                assert_eq!(order_ids(&found), vec![f.alice_order.id]);

                let by_product_id = OrderQuery::filtered(OrderFilter {
                    product_id: Some(f.keyboard.id),
                    ..Default::default()
                });
                let found = store.find_orders(&by_product_id).await.unwrap();
                assert_eq!(order_ids(&found), vec![f.bob_order.id]);

                let nobody = OrderQuery::filtered(OrderFilter {
                    product_id: Some(f.monitor.id),
                    ..Default::default()
                });
                assert!(store.find_orders(&nobody).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_order_search_lists_each_order_once() {
                let store = $factory;
                let f = load_fixture(&store).await;

                // "o" matches Alice's customer name, her laptop and her mouse
                let query = OrderQuery {
                    search: Some("o".to_string()),
                    ..Default::default()
                };
                let found = store.find_orders(&query).await.unwrap();
                assert_eq!(order_ids(&found), vec![f.alice_order.id, f.bob_order.id]);

                let keyboard = OrderQuery {
                    search: Some("keyboard".to_string()),
                    ..Default::default()
                };
                let found = store.find_orders(&keyboard).await.unwrap();
                assert_eq!(order_ids(&found), vec![f.bob_order.id]);
            }

            #[tokio::test]
            async fn test_order_ordering() {
                let store = $factory;
                let f = load_fixture(&store).await;

                let by_date = OrderQuery {
                    order_by: vec![SortKey {
                        field: OrderField::OrderDate,
                        direction: SortDirection::Asc,
                    }],
                    ..Default::default()
                };
                let found = store.find_orders(&by_date).await.unwrap();
                assert_eq!(order_ids(&found), vec![f.bob_order.id, f.alice_order.id]);

                let by_total_desc = OrderQuery {
                    order_by: vec![SortKey {
                        field: OrderField::TotalAmount,
                        direction: SortDirection::Desc,
                    }],
                    ..Default::default()
                };
                let found = store.find_orders(&by_total_desc).await.unwrap();
                assert_eq!(order_ids(&found), vec![f.alice_order.id, f.bob_order.id]);
            }

            // ==================================================================
            // Maintenance
            // ==================================================================

            #[tokio::test]
            async fn test_ping() {
                let store = $factory;
                store.ping().await.unwrap();
            }

            #[tokio::test]
            async fn test_clear_empties_every_table() {
                let store = $factory;
                load_fixture(&store).await;

                store.clear().await.unwrap();
                assert!(store.find_customers(&CustomerQuery::default()).await.unwrap().is_empty());
                assert!(store.find_products(&ProductQuery::default()).await.unwrap().is_empty());
                assert!(store.find_orders(&OrderQuery::default()).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_concurrent_access() {
                let store = $factory;
                let s1 = store.clone();
                let s2 = store.clone();

                let h1 = tokio::spawn(async move {
                    s1.insert_customer(new_customer("Concurrent A", "ca@example.com", None))
                        .await
                });
                let h2 = tokio::spawn(async move {
                    s2.insert_product(new_product("Concurrent B", "1.00", 1)).await
                });

                h1.await.unwrap().unwrap();
                h2.await.unwrap().unwrap();

                assert_eq!(store.find_customers(&CustomerQuery::default()).await.unwrap().len(), 1);
                assert_eq!(store.find_products(&ProductQuery::default()).await.unwrap().len(), 1);
            }
        }
    };
}
