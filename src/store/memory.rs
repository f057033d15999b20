//! Memory Store Module
//!
//! In-process key-value store following Redis semantics for the commands the
//! cache uses. Stands in for a Redis server in tests and in the demo binary.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::error::StoreError;
use crate::store::KeyValueStore;

// == Entry ==
/// A stored value: either a plain byte string or a list of byte strings.
#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

// == Memory Store ==
/// HashMap-backed store guarded by a single mutex.
///
/// Holding one lock per command makes every primitive atomic, which matches
/// what a single-threaded Redis server guarantees.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Key-value storage
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the number of keys currently held.
    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    // == Is Empty ==
    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, StoreError> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        debug!(key, bytes = value.len(), "SET");
        self.lock()?
            .insert(key.to_string(), Entry::Bytes(value.to_vec()));
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        debug!(key, "GET");
        match self.lock()?.get(key) {
            Some(Entry::Bytes(value)) => Ok(Some(value.clone())),
            Some(Entry::List(_)) => Err(StoreError::WrongType(key.to_string())),
            None => Ok(None),
        }
    }

    fn increment(&self, name: &str) -> Result<i64, StoreError> {
        let mut entries = self.lock()?;

        let current = match entries.get(name) {
            None => 0,
            Some(Entry::Bytes(value)) => std::str::from_utf8(value)
                .ok()
                .and_then(|text| text.parse::<i64>().ok())
                .ok_or_else(|| StoreError::NotAnInteger(name.to_string()))?,
            Some(Entry::List(_)) => return Err(StoreError::WrongType(name.to_string())),
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::NotAnInteger(name.to_string()))?;
        entries.insert(name.to_string(), Entry::Bytes(next.to_string().into_bytes()));

        debug!(name, value = next, "INCR");
        Ok(next)
    }

    fn append_to_list(&self, name: &str, entry: &[u8]) -> Result<(), StoreError> {
        let mut entries = self.lock()?;

        match entries
            .entry(name.to_string())
            .or_insert_with(|| Entry::List(Vec::new()))
        {
            Entry::List(items) => {
                items.push(entry.to_vec());
                debug!(name, len = items.len(), "RPUSH");
                Ok(())
            }
            Entry::Bytes(_) => Err(StoreError::WrongType(name.to_string())),
        }
    }

    fn read_list(&self, name: &str) -> Result<Vec<Vec<u8>>, StoreError> {
        debug!(name, "LRANGE");
        match self.lock()?.get(name) {
            Some(Entry::List(items)) => Ok(items.clone()),
            Some(Entry::Bytes(_)) => Err(StoreError::WrongType(name.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn flush_all(&self) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        debug!(removed = entries.len(), "FLUSH");
        entries.clear();
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let store = MemoryStore::new();

        store.set("key1", b"value1").unwrap();

        assert_eq!(store.get("key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_store_get_empty_value_is_not_absent() {
        let store = MemoryStore::new();

        store.set("empty", b"").unwrap();

        assert_eq!(store.get("empty").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_store_overwrite() {
        let store = MemoryStore::new();

        store.set("key1", b"value1").unwrap();
        store.set("key1", b"value2").unwrap();

        assert_eq!(store.get("key1").unwrap(), Some(b"value2".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_increment_creates_counter() {
        let store = MemoryStore::new();

        assert_eq!(store.increment("hits").unwrap(), 1);
        assert_eq!(store.increment("hits").unwrap(), 2);
        assert_eq!(store.get("hits").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_increment_existing_decimal_value() {
        let store = MemoryStore::new();

        store.set("hits", b"41").unwrap();

        assert_eq!(store.increment("hits").unwrap(), 42);
    }

    #[test]
    fn test_increment_non_integer() {
        let store = MemoryStore::new();

        store.set("hits", b"many").unwrap();

        let result = store.increment("hits");
        assert!(matches!(result, Err(StoreError::NotAnInteger(_))));
    }

    #[test]
    fn test_increment_overflow() {
        let store = MemoryStore::new();

        store.set("hits", i64::MAX.to_string().as_bytes()).unwrap();

        let result = store.increment("hits");
        assert!(matches!(result, Err(StoreError::NotAnInteger(_))));
    }

    #[test]
    fn test_list_append_and_read_in_order() {
        let store = MemoryStore::new();

        store.append_to_list("log", b"first").unwrap();
        store.append_to_list("log", b"second").unwrap();

        assert_eq!(
            store.read_list("log").unwrap(),
            vec![b"first".to_vec(), b"second".to_vec()]
        );
    }

    #[test]
    fn test_read_missing_list_is_empty() {
        let store = MemoryStore::new();
        assert!(store.read_list("missing").unwrap().is_empty());
    }

    #[test]
    fn test_wrong_type_access() {
        let store = MemoryStore::new();

        store.set("plain", b"value").unwrap();
        store.append_to_list("list", b"entry").unwrap();

        assert!(matches!(
            store.append_to_list("plain", b"x"),
            Err(StoreError::WrongType(_))
        ));
        assert!(matches!(store.read_list("plain"), Err(StoreError::WrongType(_))));
        assert!(matches!(store.get("list"), Err(StoreError::WrongType(_))));
        assert!(matches!(store.increment("list"), Err(StoreError::WrongType(_))));
    }

    #[test]
    fn test_set_replaces_list() {
        let store = MemoryStore::new();

        store.append_to_list("key", b"entry").unwrap();
        store.set("key", b"value").unwrap();

        assert_eq!(store.get("key").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn test_flush_all() {
        let store = MemoryStore::new();

        store.set("key1", b"value1").unwrap();
        store.increment("counter").unwrap();
        store.append_to_list("list", b"entry").unwrap();
        store.flush_all().unwrap();

        assert!(store.is_empty());
        assert_eq!(store.get("key1").unwrap(), None);
    }
}
