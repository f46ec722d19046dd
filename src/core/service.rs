//! Service facade shared by every transport
//!
//! REST handlers and gRPC methods both call [`OrderService`]; validation and
//! order stamping live here and nowhere else.

use super::error::{OrderError, ValidationError};
use super::model::{Drink, NewOrder, Order, PlaceOrder, Totals};
use super::store::OrderStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Behaviour switches for the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOptions {
    /// Reject orders whose drink id is not in the catalog
    #[serde(default = "default_require_known_drink")]
    pub require_known_drink: bool,
}

fn default_require_known_drink() -> bool {
    true
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            require_known_drink: default_require_known_drink(),
        }
    }
}

/// Transport-agnostic API over one store
///
/// Constructed once at startup and shared behind an `Arc` by every handler.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    options: ServiceOptions,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self::with_options(store, ServiceOptions::default())
    }

    pub fn with_options(store: Arc<dyn OrderStore>, options: ServiceOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> ServiceOptions {
        self.options
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// The drinks on the menu
    pub async fn catalog(&self) -> Result<Vec<Drink>, OrderError> {
        let drinks = self.store.list_drinks().await?;
        tracing::debug!(count = drinks.len(), "listed catalog");
        Ok(drinks)
    }

    /// Every accepted order
    pub async fn orders(&self) -> Result<Vec<Order>, OrderError> {
        let orders = self.store.list_orders().await?;
        tracing::debug!(count = orders.len(), "listed orders");
        Ok(orders)
    }

    /// Ordered quantity per drink; drinks never ordered are absent
    pub async fn totals(&self) -> Result<Totals, OrderError> {
        let totals = self.store.totals().await?;
        tracing::debug!(drinks = totals.len(), "computed totals");
        Ok(totals)
    }

    /// Validate and record an order
    ///
    /// The creation timestamp is taken here, at acceptance time.
    pub async fn place_order(&self, request: PlaceOrder) -> Result<Order, OrderError> {
        if let Err(errors) = request.validate() {
            let err = ValidationError::from(errors);
            tracing::warn!(
                drink_id = request.drink_id,
                amount = request.amount,
                "rejected order: {}",
                err
            );
            return Err(err.into());
        }

        // Both fields are >= 1 after validation
        let drink_id = request.drink_id as u64;
        let amount = request.amount as u64;

        if self.options.require_known_drink && !self.store.drink_exists(drink_id).await? {
            tracing::warn!(drink_id, amount, "rejected order for unknown drink");
            return Err(ValidationError::UnknownDrink(drink_id).into());
        }

        let order = self
            .store
            .append_order(NewOrder {
                drink_id,
                amount,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            order_id = order.id,
            drink_id = order.drink_id,
            amount = order.amount,
            "order placed"
        );
        Ok(order)
    }
}
