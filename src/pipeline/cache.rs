//! Cache Pipeline Module
//!
//! Wraps a [`Store`] with key suffixing, schema validation, serialization,
//! optional compression, the before-operation hook, and event emission.
//!
//! Validation is advisory: a violating write still reaches the store, and the
//! violation travels over the `error` event channel. The only failures a
//! caller sees are an unserializable value and a broken backend.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{BeforeOperation, CacheConfig, DEFAULT_TTL};
use crate::error::Result;
use crate::events::{CacheEvent, ErrorCause, EventBus, EventKind, ListenerHandle};
use crate::pipeline::compress;
use crate::pipeline::context::{Operation, OperationContext};
use crate::schema::CompiledSchema;
use crate::store::{Store, WriteOptions};

// == Set Options ==
/// Per-call flags for [`Cache::set`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SetOptions {
    /// Compress the serialized value, if that actually makes it shorter.
    pub gzip: bool,
    /// Write only if the key is absent; a conflict silently no-ops.
    pub nx: bool,
}

// == Cache ==
/// The operation pipeline over a backing store.
///
/// All state is fixed at construction except the event listener list.
pub struct Cache<S: Store> {
    store: S,
    schema: Option<CompiledSchema>,
    suffix: String,
    default_ttl: u64,
    hook: Option<BeforeOperation>,
    events: EventBus,
}

impl<S: Store> Cache<S> {
    // == Constructor ==
    /// Builds a cache over `store`. The schema declaration, if any, is
    /// compiled here, once.
    pub fn new(store: S, config: CacheConfig) -> Self {
        let schema = config
            .schema
            .as_ref()
            .map(CompiledSchema::compile)
            .filter(|s| !s.is_empty());
        Self {
            store,
            schema,
            suffix: config.suffix.unwrap_or_default(),
            default_ttl: config.ttl.unwrap_or(DEFAULT_TTL),
            hook: config.before_operation,
            events: EventBus::new(),
        }
    }

    /// Direct access to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // == Event Bus ==
    /// Registers an event listener.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerHandle
    where
        F: Fn(&CacheEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, listener)
    }

    /// Removes an event listener.
    pub fn off(&self, handle: ListenerHandle) -> bool {
        self.events.off(handle)
    }

    // == Set ==
    /// Validates, serializes, optionally compresses, and stores a value.
    ///
    /// Schema violations are emitted on the `error` channel and do not block
    /// the write. A value that cannot be serialized fails the call.
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<u64>,
        opts: SetOptions,
    ) -> Result<()> {
        let raw_value = serde_json::to_value(value)?;
        let effective_ttl = ttl.unwrap_or(self.default_ttl);

        self.check_schema(key, &raw_value, effective_ttl, Operation::Set);

        let serialized = serde_json::to_string(&raw_value)?;
        let stored = if opts.gzip {
            self.compress_if_shorter(key, serialized)
        } else {
            serialized
        };

        let context = OperationContext {
            operation: Operation::Set,
            key: Some(key.to_string()),
            keys: Vec::new(),
            raw_value: Some(raw_value),
            value: Some(stored.clone()),
            ttl: Some(effective_ttl),
        };
        self.fire_hook(&context);

        self.store
            .set(
                &self.suffixed(key),
                &stored,
                Some(effective_ttl),
                WriteOptions { nx: opts.nx },
            )
            .await
    }

    // == Get ==
    /// Fetches and parses a value.
    ///
    /// A stored value carrying the compression marker is decompressed first.
    /// A parse failure is emitted on the `error` channel and the call returns
    /// the raw string instead of failing.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let stored = self.store.get(&self.suffixed(key)).await?;
        let Some(stored) = stored else {
            self.fire_hook(&OperationContext::bare(Operation::Get, key));
            return Ok(None);
        };

        let parsed = self.revive(key, stored, Operation::Get);

        let context = OperationContext {
            operation: Operation::Get,
            key: Some(key.to_string()),
            keys: Vec::new(),
            raw_value: Some(parsed.clone()),
            value: None,
            ttl: None,
        };
        self.fire_hook(&context);

        Ok(Some(parsed))
    }

    // == Get Raw ==
    /// Fetches the literal stored representation, skipping decompression and
    /// parsing. Useful for inspecting what actually sits in the backend.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let stored = self.store.get(&self.suffixed(key)).await?;

        let context = OperationContext {
            operation: Operation::Get,
            key: Some(key.to_string()),
            keys: Vec::new(),
            raw_value: stored.clone().map(Value::String),
            value: stored.clone(),
            ttl: None,
        };
        self.fire_hook(&context);

        Ok(stored)
    }

    // == MSet ==
    /// Stores several values under one shared TTL as a single batched call.
    ///
    /// Validation and serialization run per key, exactly as in [`Cache::set`].
    pub async fn mset<T: Serialize>(&self, pairs: &[(&str, T)], ttl: Option<u64>) -> Result<()> {
        let effective_ttl = ttl.unwrap_or(self.default_ttl);

        let mut batch = Vec::with_capacity(pairs.len());
        let mut logical_keys = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let raw_value = serde_json::to_value(value)?;
            self.check_schema(key, &raw_value, effective_ttl, Operation::MSet);
            batch.push((self.suffixed(key), serde_json::to_string(&raw_value)?));
            logical_keys.push(key.to_string());
        }

        self.fire_hook(&OperationContext::batch(Operation::MSet, &logical_keys));

        self.store.mset(&batch, Some(effective_ttl)).await
    }

    // == MGet ==
    /// Fetches several values in one batched call, preserving input order.
    ///
    /// Each returned element goes through the same decompress/parse path as
    /// [`Cache::get`], including per-element `error` events.
    pub async fn mget(&self, keys: &[&str]) -> Result<Vec<Option<Value>>> {
        let suffixed: Vec<String> = keys.iter().map(|key| self.suffixed(key)).collect();
        let logical_keys: Vec<String> = keys.iter().map(|key| key.to_string()).collect();

        self.fire_hook(&OperationContext::batch(Operation::MGet, &logical_keys));

        let stored = self.store.mget(&suffixed).await?;
        Ok(stored
            .into_iter()
            .zip(keys)
            .map(|(value, key)| value.map(|v| self.revive(key, v, Operation::MGet)))
            .collect())
    }

    // == Del ==
    /// Removes a key. Returns whether the backend held it.
    pub async fn del(&self, key: &str) -> Result<bool> {
        self.fire_hook(&OperationContext::bare(Operation::Del, key));
        self.store.del(&self.suffixed(key)).await
    }

    // == MDel ==
    /// Removes several keys in one batched call.
    pub async fn mdel(&self, keys: &[&str]) -> Result<u64> {
        let logical_keys: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
        self.fire_hook(&OperationContext::batch(Operation::MDel, &logical_keys));

        let suffixed: Vec<String> = keys.iter().map(|key| self.suffixed(key)).collect();
        self.store.mdel(&suffixed).await
    }

    // == TTL ==
    /// Seconds remaining before the key expires.
    pub async fn ttl(&self, key: &str) -> Result<Option<u64>> {
        self.fire_hook(&OperationContext::bare(Operation::Ttl, key));
        self.store.ttl(&self.suffixed(key)).await
    }

    // == Exists ==
    /// Whether a live entry exists for the key.
    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.fire_hook(&OperationContext::bare(Operation::Exists, key));
        self.store.exists(&self.suffixed(key)).await
    }

    // == Keys ==
    /// Lists backend keys, optionally filtered by a `*`-wildcard pattern.
    ///
    /// The pattern is passed through unmodified and matches the suffixed
    /// form, since that is what the backend stores.
    pub async fn keys(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        self.fire_hook(&OperationContext::keyless(Operation::Keys));
        self.store.keys(pattern).await
    }

    // == Reset ==
    /// Drops every entry in the backend.
    pub async fn reset(&self) -> Result<()> {
        self.fire_hook(&OperationContext::keyless(Operation::Reset));
        self.store.reset().await
    }

    // == Internals ==
    /// Appends the namespace suffix to a logical key.
    fn suffixed(&self, key: &str) -> String {
        format!("{}{}", key, self.suffix)
    }

    /// Runs validation and routes any violation to the `error` channel.
    fn check_schema(&self, key: &str, value: &Value, ttl: u64, operation: Operation) {
        let Some(schema) = &self.schema else { return };
        if let Err(violation) = schema.validate(key, value, Some(ttl)) {
            warn!(key, %violation, "schema violation on {}", operation.name());
            let context = OperationContext {
                operation,
                key: Some(key.to_string()),
                keys: Vec::new(),
                raw_value: Some(value.clone()),
                value: None,
                ttl: Some(ttl),
            };
            self.events.emit(&CacheEvent::Error {
                cause: ErrorCause::Schema(violation),
                context,
            });
        }
    }

    /// Compresses a serialized string, adopting the framed form only when it
    /// is strictly shorter. Always reports the decision on the `compress`
    /// channel.
    fn compress_if_shorter(&self, key: &str, serialized: String) -> String {
        let (stored, has_gzip) = match compress::encode(&serialized) {
            Some(framed) if framed.len() < serialized.len() => (framed, true),
            _ => (serialized, false),
        };
        debug!(key, has_gzip, len = stored.len(), "compression decision");
        self.events.emit(&CacheEvent::Compress {
            key: key.to_string(),
            value: stored.clone(),
            has_gzip,
        });
        stored
    }

    /// Read-path decompression and parsing. Failures become `error` events
    /// and the raw string is returned as the best-effort result.
    fn revive(&self, key: &str, stored: String, operation: Operation) -> Value {
        let serialized = if compress::is_compressed(&stored) {
            match compress::decode(&stored) {
                Some(raw) => raw,
                None => {
                    self.emit_read_error(key, "corrupt compressed frame".to_string(), operation);
                    return Value::String(stored);
                }
            }
        } else {
            stored
        };

        match serde_json::from_str(&serialized) {
            Ok(value) => value,
            Err(err) => {
                self.emit_read_error(key, err.to_string(), operation);
                Value::String(serialized)
            }
        }
    }

    fn emit_read_error(&self, key: &str, message: String, operation: Operation) {
        warn!(key, %message, "failed to revive stored value");
        self.events.emit(&CacheEvent::Error {
            cause: ErrorCause::Deserialization(message),
            context: OperationContext::bare(operation, key),
        });
    }

    /// Invokes the before-operation hook, if one is configured.
    fn fire_hook(&self, context: &OperationContext) {
        if let Some(hook) = &self.hook {
            hook(context);
        }
    }
}

impl<S: Store + std::fmt::Debug> std::fmt::Debug for Cache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("store", &self.store)
            .field("schema", &self.schema.is_some())
            .field("suffix", &self.suffix)
            .field("default_ttl", &self.default_ttl)
            .field("hook", &self.hook.is_some())
            .field("events", &self.events)
            .finish()
    }
}
