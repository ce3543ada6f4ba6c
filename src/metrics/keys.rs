use crate::error::{MonitorError, Result};

/// Longest metric name we accept, in bytes.
pub const MAX_NAME_LEN: usize = 256;

const SAMPLES_SUFFIX: &str = "_samples";
const TIMESTAMPS_SUFFIX: &str = "_timestamps";

/// The two physical list keys backing one metric's window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowKeys {
    pub samples: String,
    pub timestamps: String,
}

/// Maps metric names onto store keys: `<prefix><name>_samples` and
/// `<prefix><name>_timestamps`.
///
/// The suffixes are fixed and neither is a suffix of the other, so stripping
/// the suffix from any key gives back exactly one metric name. That keeps
/// distinct metrics on distinct lists whatever characters the name contains.
#[derive(Debug, Clone)]
pub struct KeyScheme {
    prefix: String,
}

impl KeyScheme {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Logical key for a metric, e.g. `monitor_db.query`.
    pub fn metric_key(&self, name: &str) -> Result<String> {
        validate_name(name)?;
        Ok(format!("{}{}", self.prefix, name))
    }

    pub fn window_keys(&self, name: &str) -> Result<WindowKeys> {
        let base = self.metric_key(name)?;
        Ok(WindowKeys {
            samples: format!("{base}{SAMPLES_SUFFIX}"),
            timestamps: format!("{base}{TIMESTAMPS_SUFFIX}"),
        })
    }
}

/// Rejects names that would make awkward or unreadable store keys.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason| MonitorError::InvalidMetricName {
        name: name.to_owned(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("longer than 256 bytes"));
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid("must not contain whitespace or control characters"));
    }
    Ok(())
}
