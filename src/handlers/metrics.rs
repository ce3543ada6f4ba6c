use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::metrics::{AggregateResult, MetricDescriptor};
use crate::AppState;

use super::AppError;

// ─── Request / response types ────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Only list the children of this metric.
    pub parent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MetricDetail {
    pub metric: MetricDescriptor,
    pub children: Vec<MetricDescriptor>,
}

#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub elapsed_ms: u64,
    /// Defaults to now.
    #[serde(default)]
    pub timestamp_ms: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub metric: String,
    pub timestamp_ms: i64,
}

// ─── GET /api/metrics ────────────────────────────────────────────

pub async fn list_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<MetricDescriptor>> {
    let monitor = &state.monitor;
    let descriptors = monitor
        .metrics(params.parent.as_deref())
        .iter()
        .filter_map(|name| monitor.metric(name))
        .collect();
    Json(descriptors)
}

// ─── POST /api/metrics ───────────────────────────────────────────

pub async fn register_metric(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MetricDescriptor>), AppError> {
    state
        .monitor
        .register_metric(&req.name, &req.description, req.parent.as_deref())?;

    let descriptor = state
        .monitor
        .metric(&req.name)
        .ok_or_else(|| AppError::NotFound(format!("metric '{}' not found", req.name)))?;

    Ok((StatusCode::CREATED, Json(descriptor)))
}

// ─── GET /api/metrics/:name ──────────────────────────────────────

pub async fn get_metric(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<MetricDetail>, AppError> {
    let not_found = || AppError::NotFound(format!("metric '{name}' not registered"));

    let metric = state.monitor.metric(&name).ok_or_else(not_found)?;
    let children = state.monitor.metric_children(&name).ok_or_else(not_found)?;

    Ok(Json(MetricDetail { metric, children }))
}

// ─── POST /api/metrics/:name/samples ─────────────────────────────

pub async fn record_sample(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<RecordRequest>,
) -> Result<Json<RecordResponse>, AppError> {
    let timestamp_ms = match req.timestamp_ms {
        Some(ts) => {
            state.monitor.record(&name, req.elapsed_ms, ts).await?;
            ts
        }
        None => state.monitor.record_now(&name, req.elapsed_ms).await?,
    };

    Ok(Json(RecordResponse {
        metric: name,
        timestamp_ms,
    }))
}

// ─── GET /api/metrics/:name/stats ────────────────────────────────
/// `null` body when the window is empty.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Option<AggregateResult>>, AppError> {
    Ok(Json(state.monitor.stats(&name).await?))
}

// ─── DELETE /api/metrics/:name/stats ─────────────────────────────

pub async fn clear_stats(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    state.monitor.clear(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}
