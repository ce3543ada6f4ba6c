use axum::{
    middleware as axum_mw,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::metrics::stream;
use crate::middleware::timing;
use crate::AppState;

/// Builds the full Axum `Router` with all routes and middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ── Registry ────────────────────────────────────────────
        .route(
            "/api/metrics",
            get(handlers::metrics::list_metrics).post(handlers::metrics::register_metric),
        )
        .route("/api/metrics/:name", get(handlers::metrics::get_metric))
        // ── Sample windows ──────────────────────────────────────
        .route(
            "/api/metrics/:name/samples",
            post(handlers::metrics::record_sample),
        )
        .route(
            "/api/metrics/:name/stats",
            get(handlers::metrics::get_stats).delete(handlers::metrics::clear_stats),
        )
        // ── Aggregate views ─────────────────────────────────────
        .route("/api/stats", get(stream::get_all_stats))
        .route("/api/stats/stream", get(stream::stats_stream))
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            timing::timing_middleware,
        ))
        .layer(CorsLayer::permissive())
        // ── Provide shared state to all routes above ────────────
        .with_state(state)
}
