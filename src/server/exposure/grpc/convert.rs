//! Conversions between domain types and protobuf messages

use super::proto;
use crate::core::{Drink, Order, OrderError, PlaceOrder, Totals};
use chrono::{DateTime, Utc};
use tonic::Status;

impl From<&Drink> for proto::Drink {
    fn from(drink: &Drink) -> Self {
        Self {
            id: drink.id,
            name: drink.name.clone(),
            price: drink.price.to_string(),
            description: drink.description.clone(),
        }
    }
}

impl From<&Order> for proto::PlacedOrder {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            drink_id: order.drink_id,
            quantity: order.amount,
            created_at: Some(timestamp(order.created_at)),
        }
    }
}

impl From<proto::OrderItem> for PlaceOrder {
    fn from(item: proto::OrderItem) -> Self {
        PlaceOrder::new(item.drink_id, item.quantity)
    }
}

pub(crate) fn timestamp(at: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: at.timestamp(),
        nanos: at.timestamp_subsec_nanos() as i32,
    }
}

pub(crate) fn totals_to_proto(totals: &Totals) -> Vec<proto::DrinkTotal> {
    totals
        .iter()
        .map(|(&drink_id, &quantity)| proto::DrinkTotal { drink_id, quantity })
        .collect()
}

/// Map facade errors onto gRPC status codes
pub(crate) fn status_from(err: OrderError) -> Status {
    match err {
        OrderError::Validation(e) => Status::invalid_argument(e.to_string()),
        OrderError::Storage(e) => {
            tracing::error!(error = %e, "rpc failed in storage");
            Status::internal(e.to_string())
        }
    }
}
