//! REST API exposure
//!
//! Consumes the shared `OrderService` and produces an Axum `Router`:
//!
//! - `GET  /api/menu`       : the catalog
//! - `GET  /api/order/all`  : every order
//! - `GET  /api/order/total`: `{ "<drinkId>": total }`
//! - `POST /api/order`      : place an order from `{ "drinkId", "amount" }`
//! - `GET  /health`, `GET /healthz`

pub mod handlers;

use crate::core::OrderService;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;

/// REST API exposure implementation
///
/// Holds no state of its own; every handler calls the service facade.
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router over a service
    pub fn build_router(service: Arc<OrderService>) -> Router {
        let api = Router::new()
            .route("/api/menu", get(handlers::get_menu))
            .route("/api/order/all", get(handlers::get_orders))
            .route("/api/order/total", get(handlers::get_totals))
            .route("/api/order", post(handlers::post_order))
            .with_state(service);

        Self::health_routes().merge(api)
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "ordersystem"
        }))
    }
}
