//! Server module: exposures of the order service and the builder that wires them

pub mod builder;
pub mod exposure;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
#[cfg(feature = "grpc")]
pub use exposure::GrpcExposure;
