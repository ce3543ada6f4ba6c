use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use crate::AppState;

/// Parent metric every per-route timing metric hangs off.
pub const HTTP_METRIC: &str = "http";

/// Middleware that times every `/api` request and:
///
///   - records the handler time (µs) under `http.<METHOD>.<route>`
///   - adds `X-Response-Time-Us` and `Server-Timing` response headers
///   - logs a one-liner per request
///
/// Recording is fire-and-forget so a slow or down store never delays the
/// response.
pub async fn timing_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned());

    let start = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = start.elapsed();
    let us = elapsed.as_micros();

    // ── Inject response headers ─────────────────────────────────
    if let Ok(val) = us.to_string().parse() {
        response.headers_mut().insert("x-response-time-us", val);
    }

    let server_timing =
        format!("total;dur={:.3}", elapsed.as_secs_f64() * 1000.0);
    if let Ok(val) = server_timing.parse() {
        response.headers_mut().insert("server-timing", val);
    }

    // SSE connections live for minutes; timing them is noise.
    if !path.starts_with("/api/") || path.contains("/stream") {
        return response;
    }

    let status = response.status().as_u16();
    tracing::info!(%method, %path, status, us = us as u64, "request");

    // Unmatched paths would mint one metric per URL.
    if let Some(route) = route {
        let metric = route_metric_name(method.as_str(), &route);
        let elapsed_us = u64::try_from(us).unwrap_or(u64::MAX);
        let monitor = state.monitor.clone();

        tokio::spawn(async move {
            let registry = monitor.registry();
            let registered = registry
                .ensure_registered(HTTP_METRIC, "API handler time per route (µs)", None)
                .and_then(|_| {
                    registry.ensure_registered(&metric, "HTTP handler time (µs)", Some(HTTP_METRIC))
                });
            if let Err(e) = registered {
                tracing::warn!(metric = %metric, error = %e, "cannot register route metric");
                return;
            }
            if let Err(e) = monitor.record_now(&metric, elapsed_us).await {
                tracing::error!(metric = %metric, error = %e, "failed to record request timing");
            }
        });
    }

    response
}

/// `GET` + `/api/metrics/:name` → `http.GET.api.metrics.:name`
pub fn route_metric_name(method: &str, route: &str) -> String {
    let route = route.trim_matches('/').replace('/', ".");
    format!("{HTTP_METRIC}.{method}.{route}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::keys::validate_name;

    #[test]
    fn route_names_are_valid_metric_names() {
        let name = route_metric_name("DELETE", "/api/metrics/:name/stats");
        assert_eq!(name, "http.DELETE.api.metrics.:name.stats");
        assert!(validate_name(&name).is_ok());
    }
}
