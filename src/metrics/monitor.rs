use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use super::keys::KeyScheme;
use super::registry::{MetricDescriptor, MetricRegistry};
use super::stats::AggregateResult;
use super::window::{SampleWindow, WindowSnapshot};
use crate::config::MonitorConfig;
use crate::error::Result;
use crate::store::SampleStore;

/// Entry point for instrumented code: register names, record durations,
/// query rolling stats.
///
/// Owns its registry; build one per process and share it behind an `Arc`.
pub struct PerfMonitor {
    registry: MetricRegistry,
    window: SampleWindow,
}

impl PerfMonitor {
    pub fn new(store: Arc<dyn SampleStore>, config: &MonitorConfig) -> Self {
        Self {
            registry: MetricRegistry::new(),
            window: SampleWindow::new(
                store,
                KeyScheme::new(config.key_prefix.clone()),
                config.max_retained,
            ),
        }
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    // ── Registry ────────────────────────────────────────────────

    pub fn register_metric(&self, name: &str, description: &str, parent: Option<&str>) -> Result<()> {
        self.registry.register(name, description, parent)
    }

    /// Every registered name, or the children of `parent`.
    pub fn metrics(&self, parent: Option<&str>) -> Vec<String> {
        self.registry.names(parent)
    }

    pub fn metric(&self, name: &str) -> Option<MetricDescriptor> {
        self.registry.get(name)
    }

    pub fn metric_children(&self, name: &str) -> Option<Vec<MetricDescriptor>> {
        self.registry.children(name)
    }

    // ── Recording ───────────────────────────────────────────────

    /// Store one duration sample. `metric` need not be registered.
    pub async fn record(&self, metric: &str, elapsed: u64, timestamp: i64) -> Result<()> {
        self.window.record(metric, elapsed, timestamp).await
    }

    /// Store `elapsed` stamped with the current wall-clock time (ms since
    /// the epoch). Returns that timestamp.
    pub async fn record_now(&self, metric: &str, elapsed: u64) -> Result<i64> {
        let now = Utc::now().timestamp_millis();
        self.record(metric, elapsed, now).await?;
        Ok(now)
    }

    /// Store the milliseconds elapsed since `start`. Returns the timestamp
    /// the sample was stamped with.
    pub async fn record_since(&self, metric: &str, start: Instant) -> Result<i64> {
        let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.record_now(metric, elapsed).await
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Min/max/avg/count over the retained window, `None` when it is empty.
    pub async fn stats(&self, metric: &str) -> Result<Option<AggregateResult>> {
        let snapshot = self.window.read(metric).await?;
        Ok(AggregateResult::from_durations(metric, &snapshot.durations))
    }

    /// Raw retained samples and their timestamps, oldest first.
    pub async fn window(&self, metric: &str) -> Result<WindowSnapshot> {
        self.window.read(metric).await
    }

    pub async fn clear(&self, metric: &str) -> Result<()> {
        self.window.clear(metric).await
    }
}
