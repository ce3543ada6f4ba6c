//! Process configuration (strict YAML, every field defaulted).

use std::fs;
use std::net::SocketAddr;

use serde::Deserialize;

use crate::error::{MonitorError, Result};
use crate::metrics::window::DEFAULT_MAX_RETAINED;

/// Env var naming the YAML config file.
pub const CONFIG_PATH_ENV: &str = "PERF_MONITOR_CONFIG";
/// Env var overriding `redis.url`.
pub const REDIS_URL_ENV: &str = "REDIS_URL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub redis: RedisConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Read `$PERF_MONITOR_CONFIG` if set, otherwise use defaults, then
    /// apply `$REDIS_URL`.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => load_from_file(&path)?,
            Err(_) => Self::default(),
        };
        if let Ok(url) = std::env::var(REDIS_URL_ENV) {
            cfg.redis.url = url;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.redis.validate()?;
        self.monitor.validate()?;
        self.server.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

impl RedisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(MonitorError::Config("redis.url must not be empty".into()));
        }
        Ok(())
    }

    /// `url` with any `user:password@` part masked, safe to log.
    pub fn redacted_url(&self) -> String {
        let (scheme, rest) = match self.url.split_once("://") {
            Some((scheme, rest)) => (Some(scheme), rest),
            None => (None, self.url.as_str()),
        };
        let authority_end = rest.find('/').unwrap_or(rest.len());
        let rest = match rest[..authority_end].rfind('@') {
            Some(at) => format!("***@{}", &rest[at + 1..]),
            None => rest.to_owned(),
        };
        match scheme {
            Some(scheme) => format!("{scheme}://{rest}"),
            None => rest,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Prepended to every metric name to form its store key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Samples kept per metric after a trim.
    #[serde(default = "default_max_retained")]
    pub max_retained: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            max_retained: default_max_retained(),
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_retained == 0 {
            return Err(MonitorError::Config(
                "monitor.max_retained must be at least 1".into(),
            ));
        }
        if self.key_prefix.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(MonitorError::Config(
                "monitor.key_prefix must not contain whitespace".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Tick of the SSE stats stream.
    #[serde(default = "default_stream_interval_ms")]
    pub stream_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            stream_interval_ms: default_stream_interval_ms(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(100..=60_000).contains(&self.stream_interval_ms) {
            return Err(MonitorError::Config(
                "server.stream_interval_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            MonitorError::Config(format!("server.listen {:?} is not a socket address: {e}", self.listen))
        })
    }
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/".into()
}
fn default_key_prefix() -> String {
    "monitor_".into()
}
fn default_max_retained() -> usize {
    DEFAULT_MAX_RETAINED
}
fn default_listen() -> String {
    "0.0.0.0:3000".into()
}
fn default_stream_interval_ms() -> u64 {
    500
}

pub fn load_from_file(path: &str) -> Result<Config> {
    let s = fs::read_to_string(path)
        .map_err(|e| MonitorError::Config(format!("read {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<Config> {
    let cfg: Config = serde_yaml::from_str(s)
        .map_err(|e| MonitorError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
