//! Redis Store Module
//!
//! `KeyValueStore` backed by a single long-lived Redis connection.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::KeyValueStore;

// == Redis Store ==
/// Redis-backed store.
///
/// One connection is opened at construction and reused for every command.
/// Connect, read and write are all bounded by the timeout given to
/// [`RedisStore::connect`]. Failed commands are returned as-is; retrying is
/// left to the caller.
pub struct RedisStore {
    connection: Mutex<redis::Connection>,
    url: String,
}

impl RedisStore {
    // == Constructor ==
    /// Opens a connection to the Redis server at `url`.
    ///
    /// # Arguments
    /// * `url` - Connection URL, e.g. `redis://127.0.0.1:6379/0`
    /// * `timeout` - Upper bound on connect and on each socket read/write
    pub fn connect(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let connection = client.get_connection_with_timeout(timeout)?;
        connection.set_read_timeout(Some(timeout))?;
        connection.set_write_timeout(Some(timeout))?;

        info!("Connected to Redis at {}", url);

        Ok(Self {
            connection: Mutex::new(connection),
            url: url.to_string(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, redis::Connection>, StoreError> {
        self.connection.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").field("url", &self.url).finish()
    }
}

impl KeyValueStore for RedisStore {
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        debug!(key, bytes = value.len(), "SET");
        let mut conn = self.lock()?;
        redis::cmd("SET").arg(key).arg(value).query::<()>(&mut *conn)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        debug!(key, "GET");
        let mut conn = self.lock()?;
        Ok(redis::cmd("GET").arg(key).query(&mut *conn)?)
    }

    fn increment(&self, name: &str) -> Result<i64, StoreError> {
        let mut conn = self.lock()?;
        let value: i64 = redis::cmd("INCR").arg(name).query(&mut *conn)?;
        debug!(name, value, "INCR");
        Ok(value)
    }

    fn append_to_list(&self, name: &str, entry: &[u8]) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let len: i64 = redis::cmd("RPUSH").arg(name).arg(entry).query(&mut *conn)?;
        debug!(name, len, "RPUSH");
        Ok(())
    }

    fn read_list(&self, name: &str) -> Result<Vec<Vec<u8>>, StoreError> {
        debug!(name, "LRANGE");
        let mut conn = self.lock()?;
        Ok(redis::cmd("LRANGE")
            .arg(name)
            .arg(0)
            .arg(-1)
            .query(&mut *conn)?)
    }

    fn flush_all(&self) -> Result<(), StoreError> {
        info!("Flushing Redis database at {}", self.url);
        let mut conn = self.lock()?;
        redis::cmd("FLUSHDB").query::<()>(&mut *conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_rejects_malformed_url() {
        let result = RedisStore::connect("not a url", Duration::from_millis(100));
        assert!(matches!(result, Err(StoreError::Redis(_))));
    }
}
