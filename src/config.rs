//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::Instrumentation;

// == Backend ==
/// Which key-value store the cache runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Redis server at `REDIS_URL`
    Redis,
    /// In-process store, lost on exit
    Memory,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Backend::Redis),
            "memory" => Ok(Backend::Memory),
            other => Err(format!("unknown backend: {}", other)),
        }
    }
}

// == Replay Format ==
/// How replay output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayFormat {
    Text,
    Json,
}

impl FromStr for ReplayFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReplayFormat::Text),
            "json" => Ok(ReplayFormat::Json),
            other => Err(format!("unknown replay format: {}", other)),
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backing store
    pub backend: Backend,
    /// Redis connection URL
    pub redis_url: String,
    /// Connect and socket I/O timeout for Redis, in milliseconds
    pub redis_timeout_ms: u64,
    /// Flush the backing namespace when the cache is created
    pub flush_on_start: bool,
    /// Count calls to `Cache.store`
    pub count_calls: bool,
    /// Record call history of `Cache.store`
    pub call_history: bool,
    /// Replay output format
    pub replay_format: ReplayFormat,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `REDIS_URL` - Redis connection URL (default: redis://127.0.0.1:6379/)
    /// - `REDIS_TIMEOUT_MS` - Connect/read/write timeout (default: 2000)
    /// - `FLUSH_ON_START` - Flush the store on startup (default: true)
    /// - `COUNT_CALLS` - Count `Cache.store` calls (default: true)
    /// - `CALL_HISTORY` - Record `Cache.store` history (default: true)
    /// - `REPLAY_FORMAT` - `text` or `json` (default: text)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            backend: parse_var("CACHE_BACKEND").unwrap_or(defaults.backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            redis_timeout_ms: parse_var("REDIS_TIMEOUT_MS").unwrap_or(defaults.redis_timeout_ms),
            flush_on_start: parse_var("FLUSH_ON_START").unwrap_or(defaults.flush_on_start),
            count_calls: parse_var("COUNT_CALLS").unwrap_or(defaults.count_calls),
            call_history: parse_var("CALL_HISTORY").unwrap_or(defaults.call_history),
            replay_format: parse_var("REPLAY_FORMAT").unwrap_or(defaults.replay_format),
        }
    }

    /// Redis timeout as a `Duration`.
    pub fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }

    /// Wrappers to compose around `Cache::store`.
    pub fn instrumentation(&self) -> Instrumentation {
        Instrumentation {
            count_calls: self.count_calls,
            call_history: self.call_history,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Redis,
            redis_url: "redis://127.0.0.1:6379/".to_string(),
            redis_timeout_ms: 2000,
            flush_on_start: true,
            count_calls: true,
            call_history: true,
            replay_format: ReplayFormat::Text,
        }
    }
}

/// Reads and parses `name`; unset or unparsable values fall back to the default.
fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
