//! Configuration Module
//!
//! Construction-time options for a cache: default TTL, key suffix, optional
//! schema declaration, and the before-operation hook. Everything here is
//! fixed once the cache is built.

use std::fmt;
use std::sync::Arc;

use crate::pipeline::OperationContext;
use crate::schema::SchemaDecl;

/// Synchronous callback invoked with full context before every store call.
pub type BeforeOperation = Arc<dyn Fn(&OperationContext) + Send + Sync>;

/// Default TTL in seconds when neither the call nor the config names one.
pub const DEFAULT_TTL: u64 = 60;

// == Cache Config ==
/// Cache construction options.
#[derive(Clone, Default)]
pub struct CacheConfig {
    /// Default TTL in seconds for writes without an explicit TTL
    pub ttl: Option<u64>,
    /// Namespace string appended to every logical key
    pub suffix: Option<String>,
    /// Schema declaration; absent means validation is disabled
    pub schema: Option<SchemaDecl>,
    /// Hook fired before each store delegation
    pub before_operation: Option<BeforeOperation>,
}

impl CacheConfig {
    /// Creates an empty config: 60s default TTL, no suffix, no schema,
    /// no hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default TTL in seconds.
    pub fn ttl(mut self, seconds: u64) -> Self {
        self.ttl = Some(seconds);
        self
    }

    /// Sets the key namespace suffix.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Declares the validation schema.
    pub fn schema(mut self, schema: SchemaDecl) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Installs the before-operation hook.
    pub fn before_operation<F>(mut self, hook: F) -> Self
    where
        F: Fn(&OperationContext) + Send + Sync + 'static,
    {
        self.before_operation = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("ttl", &self.ttl)
            .field("suffix", &self.suffix)
            .field("schema", &self.schema.as_ref().map(|s| s.len()))
            .field("before_operation", &self.before_operation.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CacheConfig::new();
        assert!(config.ttl.is_none());
        assert!(config.suffix.is_none());
        assert!(config.schema.is_none());
        assert!(config.before_operation.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = CacheConfig::new()
            .ttl(120)
            .suffix("_env")
            .before_operation(|_| {});

        assert_eq!(config.ttl, Some(120));
        assert_eq!(config.suffix.as_deref(), Some("_env"));
        assert!(config.before_operation.is_some());
    }
}
