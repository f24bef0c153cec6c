use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::Html,
    Json,
};
use tracing::info;
use utoipa::OpenApi;

use super::{
    dto::{
        CountResponse, ErrorBody, IngestRequest, IngestResponse, IntervalResponse, PagedReadings,
        ReadingDto, ReadingsResponse, RecentReadings,
    },
    errors::ApiError,
    pagination::{ListMode, ListParams},
};
use crate::{
    db::{models::NewReading, SharedStore},
    polling::random_interval_secs,
    timestamps::parse_timestamp,
};

pub const INGEST_OK_MESSAGE: &str = "Dato DHT22 guardado correctamente";

const STATUS_PAGE: &str = include_str!("status_page.html");

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// Store one reading pushed by a device.
///
/// `temp` and `hum` may be any number, zero included. Identical requests
/// create separate readings.
#[utoipa::path(
    post,
    path = "/api/datos",
    request_body = IngestRequest,
    responses(
        (status = 201, description = "Reading stored", body = IngestResponse),
        (status = 400, description = "Missing field, invalid timestamp or malformed body", body = ErrorBody),
        (status = 500, description = "Reading store failure", body = ErrorBody),
    ),
    tag = "datos"
)]
pub async fn create_reading(
    State(store): State<SharedStore>,
    body: Result<Json<IngestRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let Json(req) = body?;

    let (Some(temp), Some(hum), Some(raw_timestamp)) = (
        req.temp,
        req.hum,
        req.timestamp.filter(|t| !t.is_empty()),
    ) else {
        return Err(ApiError::MissingField);
    };

    let recorded_at = parse_timestamp(&raw_timestamp).ok_or(ApiError::InvalidTimestamp)?;

    let reading = store
        .insert(NewReading {
            temperature: temp,
            humidity: hum,
            recorded_at,
        })
        .await?;

    info!(
        id = %reading.id,
        temp,
        hum,
        timestamp = %raw_timestamp,
        "Reading stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            message: INGEST_OK_MESSAGE.to_owned(),
            id: reading.id,
        }),
    ))
}

/// List readings newest first.
///
/// With `limit`, returns that many readings and `total` is the batch size.
/// Otherwise pages through the readings with `page`/`pageSize`, and `total`
/// is the number of readings in the store.
#[utoipa::path(
    get,
    path = "/api/datos",
    params(ListParams),
    responses(
        (status = 200, description = "Readings ordered by timestamp, newest first", body = ReadingsResponse),
        (status = 500, description = "Reading store failure", body = ErrorBody),
    ),
    tag = "datos"
)]
pub async fn list_readings(
    State(store): State<SharedStore>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ReadingsResponse>, ApiError> {
    let Query(params) = params?;
    let mode = ListMode::from(&params);

    let response = match mode {
        ListMode::Recent { limit } => {
            let items: Vec<ReadingDto> = store
                .list_recent(0, limit)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            ReadingsResponse::Recent(RecentReadings {
                total: items.len(),
                items,
            })
        }
        ListMode::Paged { page, page_size } => {
            // Independent reads; `total` may lag `items` under concurrent inserts.
            let (rows, total) =
                tokio::try_join!(store.list_recent(mode.skip(), page_size), store.count())?;
            ReadingsResponse::Paged(PagedReadings {
                items: rows.into_iter().map(Into::into).collect(),
                total,
                page,
                page_size,
            })
        }
    };

    Ok(Json(response))
}

/// Number of readings in the store.
#[utoipa::path(
    get,
    path = "/api/datos/count",
    responses(
        (status = 200, description = "Reading count", body = CountResponse),
        (status = 500, description = "Reading store failure", body = ErrorBody),
    ),
    tag = "datos"
)]
pub async fn count_readings(
    State(store): State<SharedStore>,
) -> Result<Json<CountResponse>, ApiError> {
    let total_registros = store.count().await?;
    Ok(Json(CountResponse { total_registros }))
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// Suggested polling interval for devices, random in 4..=60 seconds.
#[utoipa::path(
    get,
    path = "/api/update",
    responses(
        (status = 200, description = "Random polling interval", body = IntervalResponse),
    ),
    tag = "devices"
)]
pub async fn update_interval() -> Json<IntervalResponse> {
    Json(IntervalResponse {
        interval_seconds: random_interval_secs(),
    })
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// HTML status page; the reading count is fetched by the browser.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Status page", body = String, content_type = "text/html"),
    ),
    tag = "system"
)]
pub async fn status_page() -> Html<&'static str> {
    Html(STATUS_PAGE)
}

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        create_reading,
        list_readings,
        count_readings,
        update_interval,
        status_page,
        health
    ),
    components(schemas(
        IngestRequest,
        IngestResponse,
        ReadingDto,
        RecentReadings,
        PagedReadings,
        ReadingsResponse,
        IntervalResponse,
        CountResponse,
        ErrorBody
    )),
    tags(
        (name = "datos",   description = "DHT22 reading ingestion and retrieval"),
        (name = "devices", description = "Device coordination hints"),
        (name = "system",  description = "System endpoints"),
    ),
    info(
        title = "DHT22 Telemetry API",
        version = "0.1.0",
        description = "Ingestion and retrieval of ESP32 + DHT22 temperature/humidity readings"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
