//! Store Module
//!
//! The capability contract the pipeline depends on, plus the bundled bounded
//! in-memory backend. Remote backends (a Redis client, say) implement the
//! same trait outside this crate.

mod entry;
mod lru;
mod memory;

// Re-export public types
pub use entry::StoredEntry;
pub use lru::AccessOrder;
pub use memory::{MemoryStore, StoreStats};

use async_trait::async_trait;

use crate::error::Result;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Write Options ==
/// Conditional-write flags forwarded to the backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Set only if the key is absent; a conflicting write silently no-ops.
    pub nx: bool,
}

// == Store Trait ==
/// The narrow contract between the pipeline and any backend.
///
/// Values cross this boundary as UTF-8 strings; the pipeline owns
/// serialization and compression. Batch operations should reach the backend
/// as a single call where it supports one; the default implementations fall
/// back to per-key calls for backends that do not.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetches the stored string, or None when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a string with an optional TTL in seconds.
    async fn set(&self, key: &str, value: &str, ttl: Option<u64>, opts: WriteOptions)
        -> Result<()>;

    /// Removes a key. Returns whether it was present.
    async fn del(&self, key: &str) -> Result<bool>;

    /// Seconds remaining before expiry; None when absent or not expiring.
    async fn ttl(&self, key: &str) -> Result<Option<u64>>;

    /// Whether a live entry exists for the key.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Lists stored keys, optionally filtered by a `*`-wildcard pattern.
    async fn keys(&self, pattern: Option<&str>) -> Result<Vec<String>>;

    /// Drops every entry.
    async fn reset(&self) -> Result<()>;

    /// Stores several pairs under one shared TTL.
    async fn mset(&self, pairs: &[(String, String)], ttl: Option<u64>) -> Result<()> {
        for (key, value) in pairs {
            self.set(key, value, ttl, WriteOptions::default()).await?;
        }
        Ok(())
    }

    /// Fetches several keys, preserving input order.
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key).await?);
        }
        Ok(values)
    }

    /// Removes several keys. Returns how many were present.
    async fn mdel(&self, keys: &[String]) -> Result<u64> {
        let mut removed = 0;
        for key in keys {
            if self.del(key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
