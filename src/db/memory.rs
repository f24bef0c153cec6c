use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    models::{NewReading, Reading},
    ReadingStore,
};

/// Process-local [`ReadingStore`]. Readings live for the lifetime of the process.
///
/// Wrapped in `Arc` so it can be cheaply cloned and shared across tasks.
/// Readings are kept in insertion order, which is the tie-breaker for equal
/// `recorded_at` values.
#[derive(Clone, Default)]
pub struct MemoryReadingStore {
    inner: Arc<RwLock<Vec<Reading>>>,
}

impl MemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn insert(&self, reading: NewReading) -> Result<Reading> {
        let stored = Reading {
            id: Uuid::new_v4(),
            temperature: reading.temperature,
            humidity: reading.humidity,
            recorded_at: reading.recorded_at,
            created_at: Utc::now(),
        };
        self.inner.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn list_recent(&self, skip: u64, limit: u32) -> Result<Vec<Reading>> {
        let readings = self.inner.read().await;

        let mut ordered: Vec<(usize, &Reading)> = readings.iter().enumerate().collect();
        ordered.sort_by(|(ia, a), (ib, b)| {
            b.recorded_at.cmp(&a.recorded_at).then(ib.cmp(ia))
        });

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        Ok(ordered
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.inner.read().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone};

    use super::*;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 5, 14, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn new_reading(temperature: f64, minute: i64) -> NewReading {
        NewReading {
            temperature,
            humidity: 60.0,
            recorded_at: at(minute),
        }
    }

    #[tokio::test]
    async fn empty_store_returns_nothing() {
        let store = MemoryReadingStore::new();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.list_recent(0, 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_assigns_unique_ids() {
        let store = MemoryReadingStore::new();
        let a = store.insert(new_reading(21.0, 0)).await.unwrap();
        let b = store.insert(new_reading(21.0, 0)).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn list_recent_orders_by_recorded_at_desc() {
        let store = MemoryReadingStore::new();
        for minute in [2, 0, 3, 1] {
            store.insert(new_reading(minute as f64, minute)).await.unwrap();
        }

        let temps: Vec<f64> = store
            .list_recent(0, 10)
            .await
            .unwrap()
            .iter()
            .map(|r| r.temperature)
            .collect();
        assert_eq!(temps, vec![3.0, 2.0, 1.0, 0.0]);
    }

    #[tokio::test]
    async fn equal_timestamps_list_latest_insert_first() {
        let store = MemoryReadingStore::new();
        store.insert(new_reading(1.0, 5)).await.unwrap();
        store.insert(new_reading(2.0, 5)).await.unwrap();

        let page = store.list_recent(0, 2).await.unwrap();
        assert_eq!(page[0].temperature, 2.0);
        assert_eq!(page[1].temperature, 1.0);
    }

    #[tokio::test]
    async fn skip_and_limit_slice_the_sequence() {
        let store = MemoryReadingStore::new();
        for minute in 0..25 {
            store.insert(new_reading(minute as f64, minute)).await.unwrap();
        }

        let page = store.list_recent(10, 10).await.unwrap();
        assert_eq!(page.len(), 10);
        assert_eq!(page[0].temperature, 14.0);
        assert_eq!(page[9].temperature, 5.0);

        let tail = store.list_recent(20, 10).await.unwrap();
        assert_eq!(tail.len(), 5);

        assert!(store.list_recent(u64::MAX, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let store = MemoryReadingStore::new();
        let clone = store.clone();

        store.insert(new_reading(19.5, 0)).await.unwrap();

        assert_eq!(clone.count().await.unwrap(), 1);
    }
}
