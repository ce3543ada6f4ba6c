use std::sync::Arc;

use serde::Serialize;

use super::keys::KeyScheme;
use crate::error::Result;
use crate::store::SampleStore;

/// Default cap on samples kept per metric after a trim.
pub const DEFAULT_MAX_RETAINED: usize = 20_000;

/// Raw retained contents of one metric's window, oldest first.
///
/// The two sequences are read separately, so under concurrent writers they
/// may differ in length by one in-flight append.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WindowSnapshot {
    pub durations: Vec<f64>,
    pub timestamps: Vec<i64>,
}

/// Sliding-window sample engine.
///
/// Holds no window state itself; the store is the single source of truth
/// and every mutation is one atomic store call.
#[derive(Clone)]
pub struct SampleWindow {
    store: Arc<dyn SampleStore>,
    keys: KeyScheme,
    max_retained: usize,
}

impl SampleWindow {
    pub fn new(store: Arc<dyn SampleStore>, keys: KeyScheme, max_retained: usize) -> Self {
        Self {
            store,
            keys,
            max_retained: max_retained.max(1),
        }
    }

    pub fn max_retained(&self) -> usize {
        self.max_retained
    }

    /// Append one sample, trimming both lists back to `max_retained` once
    /// they have grown past twice that.
    pub async fn record(&self, metric: &str, elapsed: u64, timestamp: i64) -> Result<()> {
        let keys = self.keys.window_keys(metric)?;

        let len = self
            .store
            .append_and_trim(
                &keys.samples,
                &keys.timestamps,
                elapsed,
                timestamp,
                self.max_retained,
            )
            .await?;

        tracing::trace!(metric, len, "sample recorded");
        Ok(())
    }

    /// Read both sequences in full. Not atomic with concurrent `record`s.
    pub async fn read(&self, metric: &str) -> Result<WindowSnapshot> {
        let keys = self.keys.window_keys(metric)?;

        let (raw_durations, raw_timestamps) = tokio::try_join!(
            self.store.range(&keys.samples),
            self.store.range(&keys.timestamps),
        )?;

        Ok(WindowSnapshot {
            durations: parse_values(metric, &keys.samples, &raw_durations, parse_duration),
            timestamps: parse_values(metric, &keys.timestamps, &raw_timestamps, |s| {
                s.trim().parse::<i64>().ok()
            }),
        })
    }

    /// Drop both lists. Clearing a metric that was never recorded is a no-op.
    pub async fn clear(&self, metric: &str) -> Result<()> {
        let keys = self.keys.window_keys(metric)?;
        self.store.delete(&[keys.samples, keys.timestamps]).await
    }
}

fn parse_duration(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Values another writer left unparseable are skipped, not fatal.
fn parse_values<T>(
    metric: &str,
    key: &str,
    raw: &[String],
    parse: impl Fn(&str) -> Option<T>,
) -> Vec<T> {
    let mut out = Vec::with_capacity(raw.len());
    for value in raw {
        match parse(value) {
            Some(v) => out.push(v),
            None => tracing::warn!(metric, key, value = %value, "skipping malformed stored value"),
        }
    }
    out
}
