pub mod metrics;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::MonitorError;

// ─── Unified error type ──────────────────────────────────────────

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Store(String),
    BadRequest(String),
}

impl From<MonitorError> for AppError {
    fn from(e: MonitorError) -> Self {
        match e {
            MonitorError::StoreUnavailable(msg) => Self::Store(msg),
            e @ MonitorError::InvalidMetricName { .. } => Self::BadRequest(e.to_string()),
            MonitorError::Config(msg) => Self::BadRequest(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Store(msg) => {
                tracing::error!(error = %msg, "store unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, format!("Store: {msg}"))
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = serde_json::json!({
            "error":  message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
