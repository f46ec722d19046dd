//! API Exposure modules for different protocols
//!
//! Each exposure type consumes the shared `OrderService` and produces an axum
//! `Router` for that protocol; routers can be merged and served on one port.

pub mod rest;

pub use rest::RestExposure;

#[cfg(feature = "grpc")]
pub mod grpc;

#[cfg(feature = "grpc")]
pub use grpc::GrpcExposure;
