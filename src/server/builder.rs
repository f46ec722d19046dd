//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use crate::config::{AppConfig, Backend};
use crate::core::{OrderService, OrderStore, ServiceOptions, StartupError};
use crate::storage::InMemoryStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for creating the order service and its HTTP/gRPC server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn OrderStore>>,
    options: ServiceOptions,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            options: ServiceOptions::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Bring up the store selected by the configuration
    ///
    /// For the durable backend this reads the database settings from the
    /// environment, connects, creates the schema and prepopulates; any
    /// failure here is fatal for the process.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let builder = Self::new().with_options(config.service);

        let builder = match config.backend {
            Backend::InMemory => {
                tracing::info!("using in-memory store");
                builder.with_store(InMemoryStore::new())
            }
            Backend::Postgres => builder.with_shared_store(connect_postgres().await?),
        };

        Ok(builder)
    }

    /// Set the store (required)
    pub fn with_store(self, store: impl OrderStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Set a store that is already shared elsewhere
    pub fn with_shared_store(mut self, store: Arc<dyn OrderStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_options(mut self, options: ServiceOptions) -> Self {
        self.options = options;
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic service facade
    pub fn build_service(&mut self) -> Result<Arc<OrderService>> {
        let store = self
            .store
            .take()
            .ok_or_else(|| anyhow::anyhow!("OrderStore is required. Call .with_store()"))?;

        Ok(Arc::new(OrderService::with_options(store, self.options)))
    }

    /// Build the final router
    ///
    /// REST routes are always present; the gRPC service is merged in when
    /// the `grpc` feature is enabled.
    pub fn build(mut self) -> Result<Router> {
        let service = self.build_service()?;

        let mut app = RestExposure::build_router(service.clone());

        #[cfg(feature = "grpc")]
        {
            app = app.merge(super::exposure::GrpcExposure::build_router(service.clone()));
        }

        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        tracing::debug!(backend = service.backend(), "router built");

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "postgres")]
async fn connect_postgres() -> Result<Arc<dyn OrderStore>, StartupError> {
    use crate::config::DatabaseConfig;
    use crate::storage::PostgresStore;

    let config = DatabaseConfig::from_env()?;
    let store = PostgresStore::connect(&config).await?;
    tracing::info!("using postgres store");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres() -> Result<Arc<dyn OrderStore>, StartupError> {
    Err(crate::core::ConfigError::InvalidValue {
        field: crate::config::BACKEND_VAR.to_string(),
        value: "postgres".to_string(),
        message: "built without the 'postgres' feature".to_string(),
    }
    .into())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
