//! gRPC API exposure
//!
//! Serves the `ordersystem.OrderService` defined in `proto/ordersystem.proto`
//! with tonic. The service consumes the same `OrderService` facade as REST,
//! so validation and totals behave identically on both transports, and it is
//! mounted as an axum router so both can share one port.

pub mod order_service;

mod convert;

// Include the generated protobuf code
pub mod proto {
    tonic::include_proto!("ordersystem");
}

use crate::core::OrderService;
use axum::Router;
use std::sync::Arc;

/// gRPC API exposure implementation
///
/// # Example
///
/// ```rust,ignore
/// let service = Arc::new(OrderService::new(Arc::new(InMemoryStore::new())));
/// let app = RestExposure::build_router(service.clone())
///     .merge(GrpcExposure::build_router(service));
/// ```
pub struct GrpcExposure;

impl GrpcExposure {
    /// Build an axum router with the gRPC order service mounted
    pub fn build_router(service: Arc<OrderService>) -> Router {
        use proto::order_service_server::OrderServiceServer;
        use tonic::service::Routes;

        let mut builder = Routes::builder();
        builder.add_service(OrderServiceServer::new(
            order_service::OrderServiceImpl::new(service),
        ));
        builder.routes().into_axum_router()
    }
}
