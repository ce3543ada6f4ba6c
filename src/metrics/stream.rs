use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

use super::{AggregateResult, PerfMonitor};
use crate::AppState;

/// One registered metric with its current aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct MetricStats {
    pub name: String,
    pub description: String,
    /// `None` while the window is empty.
    pub stats: Option<AggregateResult>,
}

/// Stats for every registered metric at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub timestamp_ms: i64,
    pub metrics: Vec<MetricStats>,
}

/// Query every registered metric. Metrics whose read fails are reported
/// without stats rather than failing the whole snapshot.
pub async fn snapshot(monitor: &PerfMonitor) -> StatsSnapshot {
    let names = monitor.metrics(None);
    let mut metrics = Vec::with_capacity(names.len());

    for name in names {
        let stats = match monitor.stats(&name).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(metric = %name, error = %e, "stats read failed");
                None
            }
        };
        let description = monitor
            .metric(&name)
            .map(|m| m.description)
            .unwrap_or_default();
        metrics.push(MetricStats {
            name,
            description,
            stats,
        });
    }

    StatsSnapshot {
        timestamp_ms: chrono::Utc::now().timestamp_millis(),
        metrics,
    }
}

// ─── GET /api/stats ──────────────────────────────────────────────
/// Returns a single JSON snapshot, handy for curl.
pub async fn get_all_stats(State(state): State<Arc<AppState>>) -> Json<StatsSnapshot> {
    Json(snapshot(&state.monitor).await)
}

// ─── GET /api/stats/stream ───────────────────────────────────────
/// Server-Sent Events endpoint.
/// Pushes a full `StatsSnapshot` as JSON every `stream_interval`.
pub async fn stats_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel::<StatsSnapshot>(1);
    let period = state.stream_interval;

    // Producer exits once the client disconnects and the receiver drops.
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let snap = snapshot(&state.monitor).await;
            if tx.send(snap).await.is_err() {
                break;
            }
        }
    });

    let stream = ReceiverStream::new(rx).map(|snap| {
        let json = serde_json::to_string(&snap).unwrap_or_default();
        Ok(Event::default().data(json))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
