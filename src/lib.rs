//! Rolling duration statistics kept in Redis.
//!
//! Callers record elapsed-time samples against named metrics and later ask
//! for min/max/avg/count over the most recent samples. Each metric's window
//! is a pair of Redis lists appended to by one atomic script, which trims
//! both back to `max_retained` entries once they have doubled in size.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Instant;
//! use redis_perf_monitor::{config::MonitorConfig, metrics::PerfMonitor, store::RedisStore};
//!
//! # async fn run() -> redis_perf_monitor::error::Result<()> {
//! let store = RedisStore::open("redis://127.0.0.1:6379/").await?;
//! let monitor = PerfMonitor::new(Arc::new(store), &MonitorConfig::default());
//!
//! monitor.register_metric("import", "Nightly import duration", None)?;
//! let start = Instant::now();
//! // ... work ...
//! monitor.record_since("import", start).await?;
//!
//! if let Some(stats) = monitor.stats("import").await? {
//!     println!("{} runs, avg {} ms", stats.count, stats.avg);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod store;

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Registry plus window engine; all window state lives in the store.
    pub monitor: Arc<metrics::PerfMonitor>,

    /// Tick of the SSE stats stream.
    pub stream_interval: Duration,
}

impl AppState {
    pub fn new(monitor: Arc<metrics::PerfMonitor>, stream_interval: Duration) -> Self {
        Self {
            monitor,
            stream_interval,
        }
    }
}
