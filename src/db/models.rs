use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored DHT22 sample.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Reading {
    pub id: Uuid,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Instant reported by the device.
    pub recorded_at: DateTime<Utc>,
    /// Set by the store on insert; breaks ordering ties between equal `recorded_at`.
    pub created_at: DateTime<Utc>,
}

/// A validated reading that has not been persisted yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewReading {
    pub temperature: f64,
    pub humidity: f64,
    pub recorded_at: DateTime<Utc>,
}
