//! REST round-trip tests shared by every store backend.
//!
//! The generated suite drives a `RestExposure` router through
//! `axum_test::TestServer`, so requests go HTTP → handler → `OrderService`
//! → store → JSON response.

use axum_test::TestServer;
use ordersystem::prelude::*;

/// Serve the REST exposure of a fresh facade over `store`
pub fn rest_server(store: Arc<dyn OrderStore>) -> TestServer {
    let service = Arc::new(OrderService::new(store));
    TestServer::try_new(RestExposure::build_router(service)).unwrap()
}

/// Generate REST integration tests for a backend.
///
/// # Generated Tests
///
/// - `test_rest_menu`
/// - `test_rest_order_roundtrip`
/// - `test_rest_totals_keys_are_strings`
/// - `test_rest_rejects_invalid_orders`
/// - `test_rest_rejects_malformed_body`
/// - `test_rest_rejects_unknown_drink`
/// - `test_rest_totals_overflow_is_a_server_error`
#[macro_export]
macro_rules! rest_api_tests {
    ($store_factory:expr) => {
        mod rest_api_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use ordersystem::prelude::*;
            use serde_json::{Value, json};

            async fn make_server() -> (Arc<dyn OrderStore>, TestServer) {
                let store: Arc<dyn OrderStore> = Arc::new($store_factory);
                let server = store_harness::rest::rest_server(store.clone());
                (store, server)
            }

            #[tokio::test]
            async fn test_rest_menu() {
                let (store, server) = make_server().await;

                let response = server.get("/api/menu").await;
                response.assert_status_ok();

                let body: Value = response.json();
                let drinks = body.as_array().unwrap();
                assert_eq!(drinks.len(), store.list_drinks().await.unwrap().len());

                let first = &drinks[0];
                assert!(first["id"].is_u64());
                assert!(first["name"].is_string());
                assert!(first["price"].is_number());
                assert!(first["description"].is_string());
            }

            #[tokio::test]
            async fn test_rest_order_roundtrip() {
                let (store, server) = make_server().await;
                let drink = store_harness::first_drink(store.as_ref()).await;

                let before: Value = server.get("/api/order/all").await.json();
                let before = before.as_array().unwrap().len();

                let response = server
                    .post("/api/order")
                    .json(&json!({ "drinkId": drink.id, "amount": 2 }))
                    .await;
                response.assert_status_ok();
                response.assert_json(&json!("ok"));

                let response = server.get("/api/order/all").await;
                response.assert_status_ok();
                let orders: Value = response.json();
                let orders = orders.as_array().unwrap();
                assert_eq!(orders.len(), before + 1);

                let last = orders.last().unwrap();
                assert_eq!(last["drinkId"], json!(drink.id));
                assert_eq!(last["amount"], 2);
                assert!(last["id"].is_u64());
                assert!(last["createdAt"].is_string());
            }

            #[tokio::test]
            async fn test_rest_totals_keys_are_strings() {
                let (store, server) = make_server().await;
                let drink = store_harness::first_drink(store.as_ref()).await;
                let before = store.totals().await.unwrap();
                let base = before.get(&drink.id).copied().unwrap_or(0);

                for amount in [1, 4] {
                    server
                        .post("/api/order")
                        .json(&json!({ "drinkId": drink.id, "amount": amount }))
                        .await
                        .assert_status_ok();
                }

                let response = server.get("/api/order/total").await;
                response.assert_status_ok();

                let body: Value = response.json();
                let totals = body.as_object().unwrap();
                assert_eq!(totals[&drink.id.to_string()], json!(base + 5));
                assert_eq!(totals.len(), store.totals().await.unwrap().len());
            }

            #[tokio::test]
            async fn test_rest_rejects_invalid_orders() {
                let (store, server) = make_server().await;
                let drink = store_harness::first_drink(store.as_ref()).await;
                let before = store.list_orders().await.unwrap().len();

                for body in [
                    json!({ "drinkId": 0, "amount": 5 }),
                    json!({ "drinkId": drink.id, "amount": 0 }),
                    json!({ "drinkId": drink.id, "amount": -2 }),
                    json!({ "drinkId": drink.id, "amount": i64::MAX }),
                ] {
                    let response = server.post("/api/order").json(&body).expect_failure().await;
                    response.assert_status(StatusCode::BAD_REQUEST);

                    let error: Value = response.json();
                    assert!(error["error"].is_string(), "body: {}", error);
                }

                assert_eq!(store.list_orders().await.unwrap().len(), before);
            }

            #[tokio::test]
            async fn test_rest_rejects_malformed_body() {
                let (store, server) = make_server().await;
                let before = store.list_orders().await.unwrap().len();

                let response = server
                    .post("/api/order")
                    .text("{\"drinkId\": ")
                    .content_type("application/json")
                    .expect_failure()
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let error: Value = response.json();
                assert!(error["error"].is_string());

                let response = server
                    .post("/api/order")
                    .json(&json!({ "drinkId": "espresso", "amount": 1 }))
                    .expect_failure()
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);

                assert_eq!(store.list_orders().await.unwrap().len(), before);
            }

            #[tokio::test]
            async fn test_rest_rejects_unknown_drink() {
                let (store, server) = make_server().await;
                let unknown = store_harness::unknown_drink_id(store.as_ref()).await;

                let response = server
                    .post("/api/order")
                    .json(&json!({ "drinkId": unknown, "amount": 1 }))
                    .expect_failure()
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);

                let error: Value = response.json();
                assert_eq!(error["error"], json!(format!("unknown drink id {}", unknown)));
            }

            #[tokio::test]
            async fn test_rest_totals_overflow_is_a_server_error() {
                let (store, server) = make_server().await;
                let drink = store_harness::first_drink(store.as_ref()).await;

                for _ in 0..3 {
                    store
                        .append_order(NewOrder {
                            drink_id: drink.id,
                            amount: i64::MAX as u64,
                            created_at: chrono::Utc::now(),
                        })
                        .await
                        .unwrap();
                }

                let response = server.get("/api/order/total").expect_failure().await;
                response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

                let error: Value = response.json();
                assert!(error["error"].as_str().unwrap().contains("exceeds"));

                // The ledger itself stays readable
                server.get("/api/order/all").await.assert_status_ok();
            }
        }
    };
}
