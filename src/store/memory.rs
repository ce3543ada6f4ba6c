use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{retained_len, SampleStore};
use crate::error::Result;

/// In-process list store.
///
/// One mutex guards every list, so an append+trim is never observed half
/// done, matching what the Redis script gives us server-side.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lists: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw length of a list, `0` when the key does not exist.
    pub fn len(&self, key: &str) -> usize {
        self.lists.lock().get(key).map_or(0, Vec::len)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lists.lock().contains_key(key)
    }
}

#[async_trait]
impl SampleStore for MemoryStore {
    async fn append_and_trim(
        &self,
        samples_key: &str,
        timestamps_key: &str,
        elapsed: u64,
        timestamp: i64,
        max_retained: usize,
    ) -> Result<usize> {
        let mut lists = self.lists.lock();

        let samples = lists.entry(samples_key.to_owned()).or_default();
        samples.push(elapsed.to_string());
        let pushed = samples.len();
        let keep = retained_len(pushed, max_retained);
        if keep < pushed {
            samples.drain(..pushed - keep);
        }

        // Trimmed independently, to the same tail length.
        let timestamps = lists.entry(timestamps_key.to_owned()).or_default();
        timestamps.push(timestamp.to_string());
        if keep < pushed {
            let excess = timestamps.len().saturating_sub(keep);
            timestamps.drain(..excess);
        }

        Ok(keep)
    }

    async fn range(&self, key: &str) -> Result<Vec<String>> {
        Ok(self.lists.lock().get(key).cloned().unwrap_or_default())
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        let mut lists = self.lists.lock();
        for key in keys {
            lists.remove(key);
        }
        Ok(())
    }
}
