#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use redis_perf_monitor::config::MonitorConfig;
use redis_perf_monitor::handlers::metrics::{self, ListParams, RecordRequest, RegisterRequest};
use redis_perf_monitor::handlers::AppError;
use redis_perf_monitor::metrics::{stream, PerfMonitor};
use redis_perf_monitor::store::MemoryStore;
use redis_perf_monitor::AppState;

fn state() -> Arc<AppState> {
    let monitor = PerfMonitor::new(Arc::new(MemoryStore::new()), &MonitorConfig::default());
    Arc::new(AppState::new(Arc::new(monitor), Duration::from_millis(500)))
}

fn register(name: &str, parent: Option<&str>) -> Json<RegisterRequest> {
    Json(RegisterRequest {
        name: name.into(),
        description: format!("{name} timings"),
        parent: parent.map(Into::into),
    })
}

#[tokio::test]
async fn register_list_and_describe() {
    let st = state();
    let (status, Json(created)) = metrics::register_metric(State(st.clone()), register("db", None))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.name, "db");

    metrics::register_metric(State(st.clone()), register("db.query", Some("db")))
        .await
        .unwrap();

    let Json(all) = metrics::list_metrics(State(st.clone()), Query(ListParams::default())).await;
    assert_eq!(all.len(), 2);

    let Json(kids) = metrics::list_metrics(
        State(st.clone()),
        Query(ListParams {
            parent: Some("db".into()),
        }),
    )
    .await;
    assert_eq!(kids.len(), 1);
    assert_eq!(kids[0].name, "db.query");

    let Json(detail) = metrics::get_metric(State(st.clone()), Path("db".into()))
        .await
        .unwrap();
    assert_eq!(detail.children[0].parent.as_deref(), Some("db"));

    let missing = metrics::get_metric(State(st), Path("nope".into())).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn record_query_and_clear() {
    let st = state();
    for (elapsed, ts) in [(100, 1), (300, 2)] {
        let Json(resp) = metrics::record_sample(
            State(st.clone()),
            Path("m".into()),
            Json(RecordRequest {
                elapsed_ms: elapsed,
                timestamp_ms: Some(ts),
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp.timestamp_ms, ts);
    }

    let Json(stats) = metrics::get_stats(State(st.clone()), Path("m".into()))
        .await
        .unwrap();
    let stats = stats.unwrap();
    assert_eq!((stats.min, stats.max, stats.avg, stats.count), (100, 300, 200, 2));

    let status = metrics::clear_stats(State(st.clone()), Path("m".into()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let Json(stats) = metrics::get_stats(State(st), Path("m".into())).await.unwrap();
    assert!(stats.is_none());
}

#[tokio::test]
async fn bad_metric_name_is_a_400() {
    let st = state();
    let err = metrics::get_stats(State(st), Path("has space".into()))
        .await
        .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn store_errors_map_to_503() {
    let err = AppError::from(redis_perf_monitor::error::MonitorError::StoreUnavailable(
        "connection refused".into(),
    ));
    assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn snapshot_covers_every_registered_metric() {
    let st = state();
    st.monitor.register_metric("busy", "", None).unwrap();
    st.monitor.register_metric("idle", "", None).unwrap();
    st.monitor.record("busy", 7, 1).await.unwrap();

    let snap = stream::snapshot(&st.monitor).await;
    assert_eq!(snap.metrics.len(), 2);

    let busy = snap.metrics.iter().find(|m| m.name == "busy").unwrap();
    assert_eq!(busy.stats.as_ref().unwrap().count, 1);
    let idle = snap.metrics.iter().find(|m| m.name == "idle").unwrap();
    assert!(idle.stats.is_none());
}
