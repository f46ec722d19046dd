//! In-memory implementation of OrderStore for testing and development

use super::seed;
use crate::core::{Drink, NewOrder, Order, OrderId, OrderStore, StorageError};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Ledger {
    orders: Vec<Order>,
    last_id: OrderId,
}

/// In-memory order store
///
/// State lives for the lifetime of the process. The catalog is fixed at
/// construction; the ledger sits behind an `RwLock` so id assignment and
/// append happen under one write guard.
#[derive(Clone)]
pub struct InMemoryStore {
    drinks: Arc<Vec<Drink>>,
    ledger: Arc<RwLock<Ledger>>,
}

impl InMemoryStore {
    /// Create a store holding the seed menu and seed orders
    pub fn new() -> Self {
        let drinks: Vec<Drink> = seed::drinks()
            .into_iter()
            .zip(1..)
            .map(|(d, id)| Drink::new(id, d.name, d.price, d.description))
            .collect();

        let orders: Vec<Order> = seed::orders()
            .into_iter()
            .zip(1..)
            .map(|(o, id)| Order {
                id,
                drink_id: drinks[o.drink].id,
                amount: o.amount,
                created_at: o.created_at,
            })
            .collect();

        Self::from_parts(drinks, orders)
    }

    /// Create a store with the given catalog and an empty ledger
    pub fn with_catalog(drinks: Vec<Drink>) -> Self {
        Self::from_parts(drinks, Vec::new())
    }

    fn from_parts(drinks: Vec<Drink>, orders: Vec<Order>) -> Self {
        let last_id = orders.iter().map(|o| o.id).max().unwrap_or(0);
        Self {
            drinks: Arc::new(drinks),
            ledger: Arc::new(RwLock::new(Ledger { orders, last_id })),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "in-memory"
    }

    async fn list_drinks(&self) -> Result<Vec<Drink>, StorageError> {
        Ok(self.drinks.as_ref().clone())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StorageError> {
        let ledger = self
            .ledger
            .read()
            .map_err(|e| {
                StorageError::Unavailable(format!("Failed to acquire read lock: {}", e))
            })?;

        Ok(ledger.orders.clone())
    }

    async fn append_order(&self, order: NewOrder) -> Result<Order, StorageError> {
        let mut ledger = self
            .ledger
            .write()
            .map_err(|e| {
                StorageError::Unavailable(format!("Failed to acquire write lock: {}", e))
            })?;

        let id = ledger
            .last_id
            .checked_add(1)
            .ok_or_else(|| StorageError::Unavailable("order id space exhausted".into()))?;
        let order = order.into_order(id);

        ledger.orders.push(order.clone());
        ledger.last_id = id;

        Ok(order)
    }
}
