//! Shared test harness for order store backends
//!
//! Provides macros that generate the same test suite for every backend:
//!
//! - `order_store_tests!`: store contract and facade semantics
//! - `rest_api_tests!`: HTTP round-trips through the REST exposure
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! order_store_tests!(InMemoryStore::new());
//! rest_api_tests!(InMemoryStore::new());
//! ```
//!
//! The factory expression is evaluated inside an async test body, so it may
//! `.await`. Each evaluation must yield a freshly seeded store.

#![allow(dead_code)]

#[macro_use]
pub mod rest;

use ordersystem::core::{Drink, OrderStore};

/// First drink of a store's catalog
pub async fn first_drink(store: &dyn OrderStore) -> Drink {
    store
        .list_drinks()
        .await
        .unwrap()
        .into_iter()
        .next()
        .expect("seeded store has at least one drink")
}

/// A drink id guaranteed not to be in the catalog
pub async fn unknown_drink_id(store: &dyn OrderStore) -> u64 {
    let max = store
        .list_drinks()
        .await
        .unwrap()
        .iter()
        .map(|d| d.id)
        .max()
        .unwrap_or(0);
    max + 1000
}

/// Generate the store contract test suite for a backend.
///
/// `$store_factory` must produce an `impl OrderStore + 'static`.
///
/// # Generated Tests
///
/// - `test_catalog_is_seeded_with_unique_ids`
/// - `test_append_assigns_id_and_keeps_entries`
/// - `test_totals_match_aggregate_of_ledger`
/// - `test_totals_are_sparse`
/// - `test_place_order_updates_totals`
/// - `test_invalid_orders_do_not_mutate`
/// - `test_unknown_drink_is_rejected`
/// - `test_oversized_amount_is_rejected`
/// - `test_overflowing_totals_fail_cleanly`
/// - `test_concurrent_orders_are_not_lost`
#[macro_export]
macro_rules! order_store_tests {
    ($store_factory:expr) => {
        mod order_store_tests {
            use super::*;
            use chrono::Utc;
            use ordersystem::core::aggregate;
            use ordersystem::prelude::*;
            use std::collections::BTreeSet;

            async fn make_store() -> Arc<dyn OrderStore> {
                Arc::new($store_factory)
            }

            // ==============================================================
            // Store contract
            // ==============================================================

            #[tokio::test]
            async fn test_catalog_is_seeded_with_unique_ids() {
                let store = make_store().await;

                let drinks = store.list_drinks().await.unwrap();
                assert!(!drinks.is_empty());

                let ids: BTreeSet<_> = drinks.iter().map(|d| d.id).collect();
                assert_eq!(ids.len(), drinks.len());
                assert!(drinks.iter().all(|d| !d.name.is_empty()));
            }

            #[tokio::test]
            async fn test_append_assigns_id_and_keeps_entries() {
                let store = make_store().await;
                let drink = store_harness::first_drink(store.as_ref()).await;
                let before = store.list_orders().await.unwrap();

                let appended = store
                    .append_order(NewOrder {
                        drink_id: drink.id,
                        amount: 4,
                        created_at: Utc::now(),
                    })
                    .await
                    .unwrap();

                let after = store.list_orders().await.unwrap();
                assert_eq!(after.len(), before.len() + 1);
                assert_eq!(&after[..before.len()], &before[..]);

                let last = after.last().unwrap();
                assert_eq!(last.id, appended.id);
                assert_eq!(last.drink_id, drink.id);
                assert_eq!(last.amount, 4);
                assert!(before.iter().all(|o| o.id != appended.id));
            }

            #[tokio::test]
            async fn test_totals_match_aggregate_of_ledger() {
                let store = make_store().await;
                let drinks = store.list_drinks().await.unwrap();

                for (i, drink) in drinks.iter().enumerate() {
                    store
                        .append_order(NewOrder {
                            drink_id: drink.id,
                            amount: i as u64 + 1,
                            created_at: Utc::now(),
                        })
                        .await
                        .unwrap();
                }

                let orders = store.list_orders().await.unwrap();
                assert_eq!(
                    store.totals().await.unwrap(),
                    aggregate::totals(&orders).unwrap()
                );
            }

            #[tokio::test]
            async fn test_totals_are_sparse() {
                let store = make_store().await;

                let ordered: BTreeSet<_> = store
                    .list_orders()
                    .await
                    .unwrap()
                    .iter()
                    .map(|o| o.drink_id)
                    .collect();
                let totals = store.totals().await.unwrap();

                let keys: BTreeSet<_> = totals.keys().copied().collect();
                assert_eq!(keys, ordered);
                assert!(totals.values().all(|&total| total > 0));
            }

            // ==============================================================
            // Facade semantics
            // ==============================================================

            #[tokio::test]
            async fn test_place_order_updates_totals() {
                let store = make_store().await;
                let service = OrderService::new(store.clone());
                let drink = store_harness::first_drink(store.as_ref()).await;

                let before = service.totals().await.unwrap();
                let orders_before = service.orders().await.unwrap().len();
                let id = drink.id as i64;

                service.place_order(PlaceOrder::new(id, 2)).await.unwrap();
                service.place_order(PlaceOrder::new(id, 3)).await.unwrap();

                let after = service.totals().await.unwrap();
                let base = before.get(&drink.id).copied().unwrap_or(0);
                assert_eq!(after[&drink.id], base + 5);

                let orders = service.orders().await.unwrap();
                assert_eq!(orders.len(), orders_before + 2);
                assert_eq!(orders[orders_before].amount, 2);
                assert_eq!(orders[orders_before + 1].amount, 3);
            }

            #[tokio::test]
            async fn test_invalid_orders_do_not_mutate() {
                let store = make_store().await;
                let service = OrderService::new(store.clone());
                let drink = store_harness::first_drink(store.as_ref()).await;

                let orders_before = service.orders().await.unwrap().len();
                let totals_before = service.totals().await.unwrap();

                for request in [
                    PlaceOrder::new(0, 5),
                    PlaceOrder::new(-3, 5),
                    PlaceOrder::new(drink.id as i64, 0),
                    PlaceOrder::new(drink.id as i64, -1),
                ] {
                    let err = service.place_order(request).await.unwrap_err();
                    assert!(
                        matches!(err, OrderError::Validation(_)),
                        "expected validation error for {:?}, got {:?}",
                        request,
                        err
                    );
                }

                assert_eq!(service.orders().await.unwrap().len(), orders_before);
                assert_eq!(service.totals().await.unwrap(), totals_before);
            }

            #[tokio::test]
            async fn test_unknown_drink_is_rejected() {
                let store = make_store().await;
                let service = OrderService::new(store.clone());
                let unknown = store_harness::unknown_drink_id(store.as_ref()).await;
                let orders_before = service.orders().await.unwrap().len();

                let err = service
                    .place_order(PlaceOrder::new(unknown as i64, 1))
                    .await
                    .unwrap_err();
                assert!(matches!(
                    err,
                    OrderError::Validation(ValidationError::UnknownDrink(id)) if id == unknown
                ));
                assert_eq!(service.orders().await.unwrap().len(), orders_before);
            }

            #[tokio::test]
            async fn test_oversized_amount_is_rejected() {
                let store = make_store().await;
                let service = OrderService::new(store.clone());
                let drink = store_harness::first_drink(store.as_ref()).await;
                let id = drink.id as i64;
                let orders_before = service.orders().await.unwrap().len();

                for amount in [PlaceOrder::MAX_AMOUNT + 1, i64::MAX] {
                    let err = service
                        .place_order(PlaceOrder::new(id, amount))
                        .await
                        .unwrap_err();
                    assert!(matches!(err, OrderError::Validation(ValidationError::Fields(_))));
                }
                assert_eq!(service.orders().await.unwrap().len(), orders_before);

                let order = service
                    .place_order(PlaceOrder::new(id, PlaceOrder::MAX_AMOUNT))
                    .await
                    .unwrap();
                assert_eq!(order.amount, PlaceOrder::MAX_AMOUNT as u64);
                service.totals().await.unwrap();
            }

            #[tokio::test]
            async fn test_overflowing_totals_fail_cleanly() {
                let store = make_store().await;
                let service = OrderService::new(store.clone());
                let drink = store_harness::first_drink(store.as_ref()).await;

                for _ in 0..3 {
                    store
                        .append_order(NewOrder {
                            drink_id: drink.id,
                            amount: i64::MAX as u64,
                            created_at: Utc::now(),
                        })
                        .await
                        .unwrap();
                }

                let err = store.totals().await.unwrap_err();
                assert!(
                    matches!(err, StorageError::Overflow { drink_id } if drink_id == drink.id),
                    "unexpected error: {:?}",
                    err
                );

                let orders = store.list_orders().await.unwrap();
                assert!(matches!(
                    aggregate::totals(&orders),
                    Err(StorageError::Overflow { .. })
                ));

                let err = service.totals().await.unwrap_err();
                assert!(matches!(err, OrderError::Storage(StorageError::Overflow { .. })));
                assert!(!err.is_client_error());
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn test_concurrent_orders_are_not_lost() {
                const N: u64 = 40;

                let store = make_store().await;
                let service = OrderService::new(store.clone());
                let drink = store_harness::first_drink(store.as_ref()).await;

                let orders_before = service.orders().await.unwrap().len();
                let total_before = service
                    .totals()
                    .await
                    .unwrap()
                    .get(&drink.id)
                    .copied()
                    .unwrap_or(0);

                let tasks: Vec<_> = (1..=N)
                    .map(|amount| {
                        let service = service.clone();
                        let id = drink.id as i64;
                        tokio::spawn(async move {
                            service.place_order(PlaceOrder::new(id, amount as i64)).await
                        })
                    })
                    .collect();

                for result in futures::future::join_all(tasks).await {
                    result.unwrap().unwrap();
                }

                let orders = service.orders().await.unwrap();
                assert_eq!(orders.len(), orders_before + N as usize);

                let ids: BTreeSet<_> = orders.iter().map(|o| o.id).collect();
                assert_eq!(ids.len(), orders.len());

                let totals = service.totals().await.unwrap();
                assert_eq!(totals[&drink.id], total_before + N * (N + 1) / 2);
            }
        }
    };
}
