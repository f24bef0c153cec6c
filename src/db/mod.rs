pub mod memory;
pub mod models;
pub mod postgres;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use models::{NewReading, Reading};

pub use memory::MemoryReadingStore;
pub use postgres::PgReadingStore;

/// Persistence for readings: insert, newest-first range queries and a count.
///
/// Every query orders by `recorded_at DESC`, ties broken by insertion order
/// (newest insert first).
#[async_trait]
pub trait ReadingStore: Send + Sync {
    async fn insert(&self, reading: NewReading) -> Result<Reading>;

    /// Skip `skip` readings of the newest-first sequence and return up to `limit`.
    async fn list_recent(&self, skip: u64, limit: u32) -> Result<Vec<Reading>>;

    async fn count(&self) -> Result<i64>;
}

/// Process-lifetime store handle shared by every request handler.
pub type SharedStore = Arc<dyn ReadingStore>;

pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
