//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresStore`, a durable `OrderStore` backed by a
//! `sqlx::PgPool`. On startup it creates its tables if they are missing and
//! writes the seed menu and seed orders once.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! ordersystem = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! - `drinks`: `BIGSERIAL` id, name, `NUMERIC(10,2)` price, description
//! - `orders`: `BIGSERIAL` id, drink id, amount, creation timestamp
//!
//! Both tables carry a nullable `deleted_at` soft-delete marker; rows with a
//! marker are invisible to every query here, aggregation included.

use super::seed;
use crate::config::DatabaseConfig;
use crate::core::{
    Drink, DrinkId, NewOrder, Order, OrderStore, StartupError, StorageError, Totals,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::future::Future;
use std::time::Duration;

const BACKEND: &str = "postgres";

/// Key for the advisory lock serializing prepopulation across processes
const SEED_LOCK_KEY: i64 = 0x6f72_6465_7273;

/// `SUM` over `BIGINT` yields `NUMERIC`, so large totals reach the range check
const TOTALS_SQL: &str = "SELECT drink_id, SUM(amount) AS total \
     FROM orders WHERE deleted_at IS NULL \
     GROUP BY drink_id ORDER BY drink_id";

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Apply the required tables and indexes (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StartupError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS drinks (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL CHECK (name <> ''),
            price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
            description TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            deleted_at TIMESTAMPTZ NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| StartupError::Schema(format!("drinks table: {}", e)))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS orders (
            id BIGSERIAL PRIMARY KEY,
            drink_id BIGINT NOT NULL,
            amount BIGINT NOT NULL CHECK (amount > 0),
            created_at TIMESTAMPTZ NOT NULL,
            deleted_at TIMESTAMPTZ NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| StartupError::Schema(format!("orders table: {}", e)))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_drink_id ON orders (drink_id)")
        .execute(pool)
        .await
        .map_err(|e| StartupError::Schema(format!("orders index: {}", e)))?;

    Ok(())
}

/// Insert the seed menu and seed orders unless any drink row exists.
///
/// Runs in one transaction under an advisory lock, so concurrent or repeated
/// startups write the seed at most once. Returns whether anything was written.
pub async fn prepopulate(pool: &PgPool) -> Result<bool, StartupError> {
    let seed_err = |e: sqlx::Error| StartupError::Seed(e.to_string());

    let mut tx = pool.begin().await.map_err(seed_err)?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SEED_LOCK_KEY)
        .execute(&mut *tx)
        .await
        .map_err(seed_err)?;

    let seeded: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM drinks)")
        .fetch_one(&mut *tx)
        .await
        .map_err(seed_err)?;

    if seeded {
        tx.commit().await.map_err(seed_err)?;
        tracing::debug!("database already prepopulated");
        return Ok(false);
    }

    let mut drink_ids = Vec::new();
    for drink in seed::drinks() {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO drinks (name, price, description) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(drink.name)
        .bind(drink.price)
        .bind(drink.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(seed_err)?;
        drink_ids.push(id);
    }

    let orders = seed::orders();
    for order in &orders {
        let drink_id = drink_ids.get(order.drink).copied().ok_or_else(|| {
            StartupError::Seed(format!("seed order references drink #{}", order.drink))
        })?;
        let amount = i64::try_from(order.amount)
            .map_err(|_| StartupError::Seed(format!("seed amount {} too large", order.amount)))?;

        sqlx::query("INSERT INTO orders (drink_id, amount, created_at) VALUES ($1, $2, $3)")
            .bind(drink_id)
            .bind(amount)
            .bind(order.created_at)
            .execute(&mut *tx)
            .await
            .map_err(seed_err)?;
    }

    tx.commit().await.map_err(seed_err)?;

    tracing::info!(
        drinks = drink_ids.len(),
        orders = orders.len(),
        "prepopulated database"
    );
    Ok(true)
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct DrinkRow {
    id: i64,
    name: String,
    price: Decimal,
    description: String,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    drink_id: i64,
    amount: i64,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct TotalRow {
    drink_id: i64,
    total: Decimal,
}

fn from_db(value: i64, column: &str) -> Result<u64, StorageError> {
    u64::try_from(value).map_err(|_| StorageError::Query {
        backend: BACKEND.into(),
        message: format!("negative value {} in column {}", value, column),
    })
}

fn to_db(value: u64, column: &str) -> Result<i64, StorageError> {
    i64::try_from(value).map_err(|_| StorageError::Query {
        backend: BACKEND.into(),
        message: format!("value {} out of range for column {}", value, column),
    })
}

impl TryFrom<DrinkRow> for Drink {
    type Error = StorageError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        Ok(Drink::new(
            from_db(row.id, "drinks.id")?,
            row.name,
            row.price,
            row.description,
        ))
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = StorageError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: from_db(row.id, "orders.id")?,
            drink_id: from_db(row.drink_id, "orders.drink_id")?,
            amount: from_db(row.amount, "orders.amount")?,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// PostgresStore
// ---------------------------------------------------------------------------

/// Durable order store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// use ordersystem::config::DatabaseConfig;
/// use ordersystem::storage::PostgresStore;
///
/// let config = DatabaseConfig::from_env()?;
/// let store = PostgresStore::connect(&config).await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresStore {
    /// Connect, ensure the schema and prepopulate once
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StartupError> {
        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "connecting to database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.query_timeout)
            .connect_with(config.connect_options())
            .await
            .map_err(|e| StartupError::Connection {
                backend: BACKEND.into(),
                message: e.to_string(),
            })?;

        Self::from_pool(pool, config.query_timeout).await
    }

    /// Bring up a store on an existing pool
    pub async fn from_pool(pool: PgPool, query_timeout: Duration) -> Result<Self, StartupError> {
        ensure_schema(&pool).await?;
        prepopulate(&pool).await?;
        Ok(Self {
            pool,
            query_timeout,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run a database call under the per-operation timeout
    async fn timed<T, F>(&self, operation: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, operation).await {
            Ok(result) => result.map_err(|e| StorageError::Query {
                backend: BACKEND.into(),
                message: e.to_string(),
            }),
            Err(_) => Err(StorageError::Timeout {
                backend: BACKEND.into(),
            }),
        }
    }
}

#[async_trait]
impl OrderStore for PostgresStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn list_drinks(&self) -> Result<Vec<Drink>, StorageError> {
        let rows: Vec<DrinkRow> = self
            .timed(
                sqlx::query_as(
                    "SELECT id, name, price, description FROM drinks \
                     WHERE deleted_at IS NULL ORDER BY id",
                )
                .fetch_all(&self.pool),
            )
            .await?;

        rows.into_iter().map(Drink::try_from).collect()
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StorageError> {
        let rows: Vec<OrderRow> = self
            .timed(
                sqlx::query_as(
                    "SELECT id, drink_id, amount, created_at FROM orders \
                     WHERE deleted_at IS NULL ORDER BY id",
                )
                .fetch_all(&self.pool),
            )
            .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn append_order(&self, order: NewOrder) -> Result<Order, StorageError> {
        let drink_id = to_db(order.drink_id, "orders.drink_id")?;
        let amount = to_db(order.amount, "orders.amount")?;

        let row: OrderRow = self
            .timed(async {
                let mut tx = self.pool.begin().await?;
                let row: OrderRow = sqlx::query_as(
                    "INSERT INTO orders (drink_id, amount, created_at) VALUES ($1, $2, $3) \
                     RETURNING id, drink_id, amount, created_at",
                )
                .bind(drink_id)
                .bind(amount)
                .bind(order.created_at)
                .fetch_one(&mut *tx)
                .await?;
                tx.commit().await?;
                Ok::<_, sqlx::Error>(row)
            })
            .await?;

        Order::try_from(row)
    }

    async fn totals(&self) -> Result<Totals, StorageError> {
        let rows: Vec<TotalRow> = self
            .timed(sqlx::query_as(TOTALS_SQL).fetch_all(&self.pool))
            .await?;

        rows.into_iter()
            .map(|row| -> Result<(DrinkId, u64), StorageError> {
                let drink_id = from_db(row.drink_id, "orders.drink_id")?;
                let total = row
                    .total
                    .to_u64()
                    .ok_or(StorageError::Overflow { drink_id })?;
                Ok((drink_id, total))
            })
            .collect()
    }

    async fn drink_exists(&self, id: DrinkId) -> Result<bool, StorageError> {
        let Ok(id) = i64::try_from(id) else {
            return Ok(false);
        };

        self.timed(
            sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM drinks WHERE id = $1 AND deleted_at IS NULL)",
            )
            .bind(id)
            .fetch_one(&self.pool),
        )
        .await
    }
}
