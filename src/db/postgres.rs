use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{
    models::{NewReading, Reading},
    ReadingStore,
};

/// PostgreSQL implementation of [`ReadingStore`] over the `readings` table.
#[derive(Clone)]
pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for PgReadingStore {
    async fn insert(&self, reading: NewReading) -> Result<Reading> {
        let row = sqlx::query_as::<_, Reading>(
            r#"
            INSERT INTO readings (temperature, humidity, recorded_at)
            VALUES ($1, $2, $3)
            RETURNING id, temperature, humidity, recorded_at, created_at
            "#,
        )
        .bind(reading.temperature)
        .bind(reading.humidity)
        .bind(reading.recorded_at)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = %row.id, "Inserted reading");
        Ok(row)
    }

    async fn list_recent(&self, skip: u64, limit: u32) -> Result<Vec<Reading>> {
        // OFFSET is a BIGINT; anything past i64::MAX is an empty page anyway.
        let offset = i64::try_from(skip).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, Reading>(
            r#"
            SELECT id, temperature, humidity, recorded_at, created_at
            FROM readings
            ORDER BY recorded_at DESC, created_at DESC
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count(&self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM readings")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use sqlx::PgPool;

    use super::*;

    fn new_reading(temperature: f64, minute: i64) -> NewReading {
        NewReading {
            temperature,
            humidity: 50.0,
            recorded_at: Utc.with_ymd_and_hms(2025, 4, 5, 14, 0, 0).unwrap()
                + Duration::minutes(minute),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn insert_returns_store_assigned_fields(pool: PgPool) {
        let store = PgReadingStore::new(pool);
        let a = store.insert(new_reading(21.5, 0)).await.unwrap();
        let b = store.insert(new_reading(21.5, 0)).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.temperature, 21.5);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn list_recent_is_newest_first_with_offset(pool: PgPool) {
        let store = PgReadingStore::new(pool);
        for minute in [3, 1, 4, 2, 0] {
            store.insert(new_reading(minute as f64, minute)).await.unwrap();
        }

        let page = store.list_recent(1, 2).await.unwrap();
        let temps: Vec<f64> = page.iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![3.0, 2.0]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn empty_table_counts_zero(pool: PgPool) {
        let store = PgReadingStore::new(pool);
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.list_recent(0, 20).await.unwrap().is_empty());
    }
}
