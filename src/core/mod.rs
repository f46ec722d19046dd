//! Core module: domain model, aggregation, store boundary and service facade

pub mod aggregate;
pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use error::{ConfigError, OrderError, StartupError, StorageError, ValidationError};
pub use model::{Drink, DrinkId, NewOrder, Order, OrderId, PlaceOrder, Totals};
pub use service::{OrderService, ServiceOptions};
pub use store::OrderStore;
