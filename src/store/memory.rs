//! Memory Store Module
//!
//! The bundled backend: a bounded in-process map with per-entry TTL expiry
//! and LRU eviction at capacity. Shareable via `Arc`; a single mutex guards
//! the map, the recency queue, and the counters, so batch operations are
//! atomic with respect to other callers.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{CacheError, Result};
use crate::schema::WildcardPattern;
use crate::store::{AccessOrder, Store, StoredEntry, WriteOptions, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

// == Store Stats ==
/// Hit/miss/eviction counters for the in-memory backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, StoredEntry>,
    order: AccessOrder,
    stats: StoreStats,
}

// == Memory Store ==
/// Bounded in-memory backend with TTL expiry and LRU eviction.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    max_entries: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` live entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_entries,
        }
    }

    /// Current counters.
    pub fn stats(&self) -> StoreStats {
        self.lock().stats
    }

    /// Number of entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    // == Purge Expired ==
    /// Drops every expired entry. Returns how many were removed.
    ///
    /// Called by the background sweep task; expired entries are otherwise
    /// removed lazily when read.
    pub fn purge_expired(&self) -> usize {
        let mut inner = self.lock();
        let dead: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &dead {
            inner.entries.remove(key);
            inner.order.forget(key);
            inner.stats.expirations += 1;
        }
        dead.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }

    /// Removes an entry that was found expired during a read path.
    fn drop_expired(inner: &mut Inner, key: &str) {
        inner.entries.remove(key);
        inner.order.forget(key);
        inner.stats.expirations += 1;
    }

    /// Shared set path used by both `set` and `mset` under one lock.
    fn insert(inner: &mut Inner, max_entries: usize, key: &str, value: &str, ttl: Option<u64>)
        -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let is_overwrite = inner.entries.contains_key(key);
        if !is_overwrite && inner.entries.len() >= max_entries {
            match inner.order.pop_oldest() {
                Some(victim) => {
                    inner.entries.remove(&victim);
                    inner.stats.evictions += 1;
                }
                None => {
                    return Err(CacheError::StoreFull(
                        "store is full and eviction found no candidate".to_string(),
                    ))
                }
            }
        }

        inner
            .entries
            .insert(key.to_string(), StoredEntry::new(value.to_string(), ttl));
        inner.order.touch(key);
        Ok(())
    }

    /// Live-entry check under an already-held lock.
    fn live(inner: &Inner, key: &str) -> bool {
        inner
            .entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    /// Shared read path for `get` and `mget`: lazy-expires, counts, touches.
    fn fetch(inner: &mut Inner, key: &str) -> Option<String> {
        if matches!(inner.entries.get(key), Some(entry) if entry.is_expired()) {
            Self::drop_expired(inner, key);
            inner.stats.misses += 1;
            return None;
        }
        match inner.entries.get(key).map(|entry| entry.value.clone()) {
            Some(value) => {
                inner.stats.hits += 1;
                inner.order.touch(key);
                Some(value)
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut inner = self.lock();
        Ok(Self::fetch(&mut inner, key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>, opts: WriteOptions)
        -> Result<()> {
        let mut inner = self.lock();
        // NX: a live entry wins, silently.
        if opts.nx && Self::live(&inner, key) {
            return Ok(());
        }
        Self::insert(&mut inner, self.max_entries, key, value, ttl)
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let mut inner = self.lock();
        let removed = inner.entries.remove(key).is_some();
        if removed {
            inner.order.forget(key);
        }
        Ok(removed)
    }

    async fn ttl(&self, key: &str) -> Result<Option<u64>> {
        let mut inner = self.lock();
        if matches!(inner.entries.get(key), Some(entry) if entry.is_expired()) {
            Self::drop_expired(&mut inner, key);
            return Ok(None);
        }
        Ok(inner.entries.get(key).and_then(|entry| entry.remaining_secs()))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut inner = self.lock();
        if matches!(inner.entries.get(key), Some(entry) if entry.is_expired()) {
            Self::drop_expired(&mut inner, key);
            return Ok(false);
        }
        Ok(inner.entries.contains_key(key))
    }

    async fn keys(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        let inner = self.lock();
        let matcher = pattern.map(WildcardPattern::new);
        let mut keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .filter(|(key, _)| matcher.as_ref().map_or(true, |m| m.matches(key)))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn reset(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
        Ok(())
    }

    async fn mset(&self, pairs: &[(String, String)], ttl: Option<u64>) -> Result<()> {
        let mut inner = self.lock();
        for (key, value) in pairs {
            Self::insert(&mut inner, self.max_entries, key, value, ttl)?;
        }
        Ok(())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        let mut inner = self.lock();
        Ok(keys.iter().map(|key| Self::fetch(&mut inner, key)).collect())
    }

    async fn mdel(&self, keys: &[String]) -> Result<u64> {
        let mut inner = self.lock();
        let mut removed = 0;
        for key in keys {
            if inner.entries.remove(key.as_str()).is_some() {
                inner.order.forget(key);
                removed += 1;
            }
        }
        Ok(removed)
    }
}
