use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::models::Reading,
    timestamps::{format_local, format_utc},
};

/// Request body for `POST /api/datos`.
///
/// Every field is optional at the decoding stage so that a missing field is
/// reported as such rather than as a generic decoding failure.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestRequest {
    /// Degrees Celsius. A numeric string is accepted as well.
    #[serde(default, deserialize_with = "lenient_number")]
    #[schema(value_type = f64)]
    pub temp: Option<f64>,
    /// Relative humidity percentage. A numeric string is accepted as well.
    #[serde(default, deserialize_with = "lenient_number")]
    #[schema(value_type = f64)]
    pub hum: Option<f64>,
    /// Device time, e.g. `2025-04-05 14:32:10` (read as UTC) or RFC 3339.
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Reads a JSON number or a numeric string; `null` reads as absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}

/// Response for a stored reading.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    pub message: String,
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadingDto {
    pub temp: f64,
    pub hum: f64,
    /// Mexico City wall-clock time, `d/M/yyyy, H:mm:ss`.
    pub timestamp_local: String,
    /// ISO-8601 UTC with milliseconds.
    pub timestamp_utc: String,
}

impl From<Reading> for ReadingDto {
    fn from(r: Reading) -> Self {
        Self {
            temp: r.temperature,
            hum: r.humidity,
            timestamp_local: format_local(r.recorded_at),
            timestamp_utc: format_utc(r.recorded_at),
        }
    }
}

/// `limit` mode. `total` is the number of items in this response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecentReadings {
    pub items: Vec<ReadingDto>,
    pub total: usize,
}

/// Paged mode. `total` is the number of readings in the store.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagedReadings {
    pub items: Vec<ReadingDto>,
    pub total: i64,
    pub page: u64,
    pub page_size: u32,
}

/// Response for `GET /api/datos`; the shape depends on the query mode.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ReadingsResponse {
    Recent(RecentReadings),
    Paged(PagedReadings),
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntervalResponse {
    pub interval_seconds: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CountResponse {
    pub total_registros: i64,
}

/// Body of every JSON error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
