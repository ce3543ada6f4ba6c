use serde::Serialize;

/// Rolling summary of one metric's retained window.
///
/// Computed fresh on every query and never stored. Values are in whatever
/// unit the samples were recorded in (milliseconds for `record_since`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    pub metric: String,
    pub min: u64,
    pub max: u64,
    /// Mean, rounded to the nearest integer.
    pub avg: u64,
    pub count: usize,
}

impl AggregateResult {
    /// Reduce a window's durations. `None` when there is nothing to reduce.
    pub fn from_durations(metric: &str, durations: &[f64]) -> Option<Self> {
        let (first, rest) = durations.split_first()?;

        let (min, max, sum) = rest
            .iter()
            .fold((*first, *first, *first), |(min, max, sum), &v| {
                (min.min(v), max.max(v), sum + v)
            });
        let count = durations.len();

        Some(Self {
            metric: metric.to_owned(),
            min: round(min),
            max: round(max),
            avg: round(sum / count as f64),
            count,
        })
    }
}

fn round(v: f64) -> u64 {
    // Durations are validated non-negative on read.
    v.round() as u64
}
