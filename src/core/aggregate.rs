//! Per-drink totals derived from the ledger

use super::error::StorageError;
use super::model::{Order, Totals};

/// Sum ordered quantity per drink
///
/// Drinks without orders are absent from the result. A total that would not
/// fit in a `u64` fails with `StorageError::Overflow` instead of wrapping.
pub fn totals<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Result<Totals, StorageError> {
    orders.into_iter().try_fold(Totals::new(), |mut acc, order| {
        let total = acc.entry(order.drink_id).or_insert(0);
        *total = total.checked_add(order.amount).ok_or(StorageError::Overflow {
            drink_id: order.drink_id,
        })?;
        Ok(acc)
    })
}
