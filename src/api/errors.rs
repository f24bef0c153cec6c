use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Faltan campos: temp, hum o timestamp")]
    MissingField,

    #[error("Formato de timestamp inválido")]
    InvalidTimestamp,

    /// Body or query string that could not be decoded at all.
    #[error("{0}")]
    Malformed(String),

    /// Any failure of the reading store. The message is passed through to the client.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField | ApiError::InvalidTimestamp | ApiError::Malformed(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Store(e) = &self {
            error!(error = %e, "Reading store request failed");
        }
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}
