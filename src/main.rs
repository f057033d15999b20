//! Redis Basic - A value cache over a key-value store
//!
//! Stores each command-line argument, reads it back, and replays the recorded
//! history of `Cache.store`.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redis_basic::config::{Backend, ReplayFormat};
use redis_basic::{
    Cache, Config, KeyValueStore, MemoryStore, RedisStore, Transcript, Value, STORE_OPERATION,
};

/// Values stored when no arguments are given.
const DEMO_VALUES: [&str; 3] = ["foo", "bar", "42"];

/// Main entry point.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the configured store and create the cache
/// 4. Store every argument and read it back
/// 5. Print the call count and the replay of `Cache.store`
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_basic=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, flush_on_start={}, count_calls={}, call_history={}",
        config.backend, config.flush_on_start, config.count_calls, config.call_history
    );

    let store: Arc<dyn KeyValueStore> = match config.backend {
        Backend::Redis => Arc::new(
            RedisStore::connect(&config.redis_url, config.redis_timeout())
                .with_context(|| format!("connecting to {}", config.redis_url))?,
        ),
        Backend::Memory => Arc::new(MemoryStore::new()),
    };

    let cache = if config.flush_on_start {
        Cache::new(store, config.instrumentation())?
    } else {
        Cache::open(store, config.instrumentation())
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let values: Vec<Value> = if args.is_empty() {
        DEMO_VALUES.iter().map(|v| Value::parse_literal(v)).collect()
    } else {
        args.iter().map(|v| Value::parse_literal(v)).collect()
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for value in values {
        let key = cache.store(value.clone())?;
        let read_back = match value {
            Value::Int(_) => cache.retrieve_int(key.as_str())?.map(|n| n.to_string()),
            Value::Float(_) => cache.retrieve_float(key.as_str())?.map(|x| x.to_string()),
            Value::Text(_) | Value::Bytes(_) => cache.retrieve_str(key.as_str())?,
        };
        writeln!(out, "{} -> {}", key, read_back.unwrap_or_default())?;
    }

    writeln!(
        out,
        "{} counted {} call(s)",
        STORE_OPERATION,
        cache.call_count(STORE_OPERATION)?
    )?;

    let transcript = Transcript::load(&*cache.handle(), STORE_OPERATION)?;
    match config.replay_format {
        ReplayFormat::Text => transcript.write_to(&mut out)?,
        ReplayFormat::Json => writeln!(out, "{}", transcript.to_json()?)?,
    }

    info!("Done");
    Ok(())
}
