//! Write Handle Module
//!
//! A narrowed, write-only view over a cache. Components that must be able to
//! store values (a session layer, say) get this instead of the full cache, so
//! they cannot read, delete, or reconfigure anything — and the wrapped cache
//! is never mutated to graft the behavior on.

use serde::Serialize;

use crate::error::Result;
use crate::pipeline::cache::{Cache, SetOptions};
use crate::store::Store;

// == Write Handle ==
/// Write-only view borrowed from a [`Cache`].
#[derive(Debug)]
pub struct WriteHandle<'a, S: Store> {
    cache: &'a Cache<S>,
}

impl<S: Store> Cache<S> {
    /// Hands out a write-only view of this cache.
    pub fn write_handle(&self) -> WriteHandle<'_, S> {
        WriteHandle { cache: self }
    }
}

impl<S: Store> WriteHandle<'_, S> {
    /// Stores a value through the full pipeline (validation, serialization,
    /// compression, hook, events).
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<u64>,
        opts: SetOptions,
    ) -> Result<()> {
        self.cache.set(key, value, ttl, opts).await
    }

    /// Stores several values under one shared TTL.
    pub async fn mset<T: Serialize>(&self, pairs: &[(&str, T)], ttl: Option<u64>) -> Result<()> {
        self.cache.mset(pairs, ttl).await
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use crate::config::CacheConfig;
    use crate::pipeline::Cache;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_writes_through_handle_land_in_the_cache() {
        let cache = Cache::new(MemoryStore::new(100), CacheConfig::new());

        let writer = cache.write_handle();
        writer
            .set("k", &json!({"a": 1}), None, Default::default())
            .await
            .unwrap();
        writer.mset(&[("b", json!(2))], Some(30)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(json!({"a": 1})));
        assert_eq!(cache.get("b").await.unwrap(), Some(json!(2)));
    }
}
