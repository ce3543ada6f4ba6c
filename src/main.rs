use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use redis_perf_monitor::config::Config;
use redis_perf_monitor::metrics::PerfMonitor;
use redis_perf_monitor::middleware::timing::HTTP_METRIC;
use redis_perf_monitor::store::RedisStore;
use redis_perf_monitor::{server, AppState};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "perf-monitor exited");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // ── 1. Config ────────────────────────────────────────────────
    let cfg = Config::load()?;
    let listen = cfg.server.listen_addr()?;

    // ── 2. Connect to Redis ──────────────────────────────────────
    tracing::info!(url = %cfg.redis.redacted_url(), "connecting to redis");
    let store = RedisStore::open(&cfg.redis.url).await?;

    // ── 3. Build shared state ────────────────────────────────────
    let monitor = Arc::new(PerfMonitor::new(Arc::new(store), &cfg.monitor));
    monitor.register_metric(HTTP_METRIC, "API handler time per route (µs)", None)?;

    let state = Arc::new(AppState::new(
        monitor,
        Duration::from_millis(cfg.server.stream_interval_ms),
    ));

    // ── 4. Build Axum router ─────────────────────────────────────
    let app = server::create_router(state);

    // ── 5. Bind & serve ──────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!(
        %listen,
        key_prefix = %cfg.monitor.key_prefix,
        max_retained = cfg.monitor.max_retained,
        "perf-monitor listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
