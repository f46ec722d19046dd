//! HTTP handlers for the menu and order endpoints

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use crate::core::{Drink, Order, OrderError, OrderService, PlaceOrder, Totals, ValidationError};

/// Application state shared across handlers
pub type AppState = Arc<OrderService>;

/// `GET /api/menu`
pub async fn get_menu(State(service): State<AppState>) -> Result<Json<Vec<Drink>>, OrderError> {
    Ok(Json(service.catalog().await?))
}

/// `GET /api/order/all`
pub async fn get_orders(State(service): State<AppState>) -> Result<Json<Vec<Order>>, OrderError> {
    Ok(Json(service.orders().await?))
}

/// `GET /api/order/total`
pub async fn get_totals(State(service): State<AppState>) -> Result<Json<Totals>, OrderError> {
    Ok(Json(service.totals().await?))
}

/// `POST /api/order`
///
/// Responds `200 "ok"` once the order is recorded. An undecodable body is a
/// validation failure like any other: `400 {"error": ...}`.
pub async fn post_order(
    State(service): State<AppState>,
    payload: Result<Json<PlaceOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<&'static str>), OrderError> {
    let Json(request) =
        payload.map_err(|rejection| ValidationError::Malformed(rejection.body_text()))?;

    service.place_order(request).await?;

    Ok((StatusCode::OK, Json("ok")))
}
