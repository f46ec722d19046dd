//! Domain model: drinks on the menu and orders in the ledger

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Identifier of a drink in the catalog
pub type DrinkId = u64;

/// Identifier of an order in the ledger
pub type OrderId = u64;

/// Per-drink sum of ordered quantity
///
/// Sparse: drinks that were never ordered have no entry, so a missing key
/// means zero.
pub type Totals = BTreeMap<DrinkId, u64>;

/// A purchasable drink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: DrinkId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
}

impl Drink {
    pub fn new(
        id: DrinkId,
        name: impl Into<String>,
        price: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            description: description.into(),
        }
    }
}

/// An accepted order as stored in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub drink_id: DrinkId,
    pub amount: u64,
    pub created_at: DateTime<Utc>,
}

/// An order about to be appended to the ledger
///
/// The store assigns the identifier; everything else is fixed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrder {
    pub drink_id: DrinkId,
    pub amount: u64,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    /// Materialize the order under the identifier assigned by the store
    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            drink_id: self.drink_id,
            amount: self.amount,
            created_at: self.created_at,
        }
    }
}

/// Caller request to place an order
///
/// Fields are signed so that zero and negative input reaches validation
/// instead of failing to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    #[validate(range(min = 1, message = "drink id must reference a drink"))]
    pub drink_id: i64,

    #[validate(range(
        min = 1,
        max = 1_000_000_000,
        message = "amount must be between 1 and 1000000000"
    ))]
    pub amount: i64,
}

impl PlaceOrder {
    /// Largest quantity a single order may carry
    pub const MAX_AMOUNT: i64 = 1_000_000_000;

    pub fn new(drink_id: i64, amount: i64) -> Self {
        Self { drink_id, amount }
    }
}
