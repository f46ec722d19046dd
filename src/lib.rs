//! # ordersystem
//!
//! A drink ordering service: a catalog of drinks, an append-only ledger of
//! orders, and per-drink totals, exposed over REST and gRPC.
//!
//! ## Features
//!
//! - **One facade, many transports**: REST handlers and gRPC methods both call
//!   [`OrderService`](core::OrderService), which owns validation and stamping
//! - **Two stores**: volatile [`InMemoryStore`](storage::InMemoryStore) and
//!   durable `PostgresStore` (feature `postgres`), chosen by configuration
//! - **Sparse totals**: drinks that were never ordered are absent from totals
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ordersystem::prelude::*;
//!
//! let service = OrderService::new(Arc::new(InMemoryStore::new()));
//! service.place_order(PlaceOrder::new(1, 2)).await?;
//! let totals = service.totals().await?;
//!
//! // Or serve it
//! ServerBuilder::new()
//!     .with_store(InMemoryStore::new())
//!     .serve("127.0.0.1:3000")
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ConfigError, Drink, DrinkId, NewOrder, Order, OrderError, OrderId, OrderService,
        OrderStore, PlaceOrder, ServiceOptions, StartupError, StorageError, Totals,
        ValidationError,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Config ===
    pub use crate::config::{AppConfig, Backend, DatabaseConfig};

    // === Server ===
    #[cfg(feature = "grpc")]
    pub use crate::server::GrpcExposure;
    pub use crate::server::{RestExposure, ServerBuilder};

    // === External dependencies ===
    pub use std::sync::Arc;
}
