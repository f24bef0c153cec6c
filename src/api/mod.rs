pub mod dto;
pub mod errors;
pub mod handlers;
pub mod pagination;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::db::SharedStore;
use handlers::ApiDoc;

pub fn router(store: SharedStore) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route(
            "/api/datos",
            get(handlers::list_readings).post(handlers::create_reading),
        )
        .route("/api/datos/count", get(handlers::count_readings))
        .with_state(store)
        .split_for_parts();

    router
        .route("/", get(handlers::status_page))
        .route("/api/update", get(handlers::update_interval))
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
