//! Ordered-list persistence behind the sample windows.
//!
//! The window engine only ever talks to a [`SampleStore`]; Redis is the
//! production backend and [`MemoryStore`] serves embedding and tests.

pub mod memory;
pub mod redis_client;

use async_trait::async_trait;

use crate::error::Result;

pub use self::memory::MemoryStore;
pub use self::redis_client::RedisStore;

/// The minimal command set the window engine needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SampleStore: Send + Sync {
    /// Push `elapsed` onto `samples_key` and `timestamp` onto
    /// `timestamps_key`; if the sample list is then longer than
    /// `2 * max_retained`, trim both lists to their last `max_retained`
    /// entries. Must run as one indivisible step.
    ///
    /// Returns the sample-list length after the step.
    async fn append_and_trim(
        &self,
        samples_key: &str,
        timestamps_key: &str,
        elapsed: u64,
        timestamp: i64,
        max_retained: usize,
    ) -> Result<usize>;

    /// Full list contents, oldest first. A missing key reads as empty.
    async fn range(&self, key: &str) -> Result<Vec<String>>;

    /// Remove every listed key in a single command. Missing keys are fine.
    async fn delete(&self, keys: &[String]) -> Result<()>;
}

/// Sample-list length a store should keep after one append, given the
/// length right after pushing.
pub(crate) fn retained_len(pushed_len: usize, max_retained: usize) -> usize {
    if pushed_len > 2 * max_retained {
        max_retained
    } else {
        pushed_len
    }
}
