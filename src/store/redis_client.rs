use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

use super::SampleStore;
use crate::error::Result;

/// Push both values, then trim both lists to the last `ARGV[3]` entries once
/// the sample list has grown past twice that. Runs atomically on the server.
const APPEND_AND_TRIM_LUA: &str = r#"
local len = redis.call("RPUSH", KEYS[1], ARGV[1])
redis.call("RPUSH", KEYS[2], ARGV[2])

local keep = tonumber(ARGV[3])
if len > 2 * keep then
    redis.call("LTRIM", KEYS[1], -keep, -1)
    redis.call("LTRIM", KEYS[2], -keep, -1)
    return keep
end

return len
"#;

/// Creates a single `ConnectionManager` that auto-reconnects on failure.
///
/// `ConnectionManager` is cheaply cloneable; every clone shares the same
/// underlying multiplexed TCP connection.
pub async fn connect(url: &str) -> Result<ConnectionManager> {
    let client = redis::Client::open(url)?;
    Ok(ConnectionManager::new(client).await?)
}

/// Redis-backed [`SampleStore`].
pub struct RedisStore {
    conn: ConnectionManager,
    append_script: Script,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            append_script: Script::new(APPEND_AND_TRIM_LUA),
        }
    }

    pub async fn open(url: &str) -> Result<Self> {
        Ok(Self::new(connect(url).await?))
    }
}

#[async_trait]
impl SampleStore for RedisStore {
    async fn append_and_trim(
        &self,
        samples_key: &str,
        timestamps_key: &str,
        elapsed: u64,
        timestamp: i64,
        max_retained: usize,
    ) -> Result<usize> {
        let mut conn = self.conn.clone();

        // EVALSHA with automatic EVAL fallback on NOSCRIPT.
        let mut invocation = self.append_script.prepare_invoke();
        invocation
            .key(samples_key)
            .key(timestamps_key)
            .arg(elapsed)
            .arg(timestamp)
            .arg(max_retained);
        let len: usize = invocation.invoke_async(&mut conn).await?;
        Ok(len)
    }

    async fn range(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let values: Vec<String> = conn.lrange(key, 0, -1).await?;
        Ok(values)
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }

        // One DEL for every key, so the lists vanish together.
        let mut cmd = redis::cmd("DEL");
        for key in keys {
            cmd.arg(key);
        }
        let mut conn = self.conn.clone();
        let _: () = cmd.query_async(&mut conn).await?;
        Ok(())
    }
}
