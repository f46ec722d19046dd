//! Persistence boundary for the catalog and the order ledger

use super::aggregate;
use super::error::StorageError;
use super::model::{Drink, DrinkId, NewOrder, Order, Totals};
use async_trait::async_trait;

/// Store owning the catalog and the ledger
///
/// Implementations provide the catalog (fixed after initialization) and an
/// append-only ledger. Every operation is atomic: a failed call leaves the
/// store exactly as it was.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Short backend name used in logs and errors
    fn backend(&self) -> &'static str;

    /// List every drink in the catalog
    async fn list_drinks(&self) -> Result<Vec<Drink>, StorageError>;

    /// List every non-deleted order, oldest first
    async fn list_orders(&self) -> Result<Vec<Order>, StorageError>;

    /// Append an order to the ledger and return it with its assigned id
    async fn append_order(&self, order: NewOrder) -> Result<Order, StorageError>;

    /// Sum ordered quantity per drink
    ///
    /// Backends with native aggregation should override this.
    async fn totals(&self) -> Result<Totals, StorageError> {
        let orders = self.list_orders().await?;
        aggregate::totals(&orders)
    }

    /// Whether the catalog contains the given drink
    async fn drink_exists(&self, id: DrinkId) -> Result<bool, StorageError> {
        let drinks = self.list_drinks().await?;
        Ok(drinks.iter().any(|d| d.id == id))
    }
}
