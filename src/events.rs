//! Event Bus Module
//!
//! A per-instance publish mechanism with two channels: `error` for schema
//! violations and parse failures, and `compress` for compression outcomes.
//! Each cache owns its own bus, so two caches in one process never
//! cross-deliver events.
//!
//! Dispatch snapshots the listener list before invoking anything, so
//! registration and removal are safe at any time relative to in-flight
//! operations.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::pipeline::OperationContext;
use crate::schema::SchemaViolation;

// == Event Kind ==
/// The two channels a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Schema violations and deserialization failures.
    Error,
    /// Compression decisions, adopted or not.
    Compress,
}

// == Error Cause ==
/// What went wrong, for events on the `error` channel.
#[derive(Debug, Clone)]
pub enum ErrorCause {
    /// A write failed validation against the declared schema.
    Schema(SchemaViolation),
    /// A stored string could not be parsed back on read.
    Deserialization(String),
}

// == Cache Event ==
/// A single published event.
#[derive(Debug, Clone)]
pub enum CacheEvent {
    Error {
        cause: ErrorCause,
        context: OperationContext,
    },
    Compress {
        /// Logical key, before suffixing.
        key: String,
        /// The string that was (or will be) stored.
        value: String,
        /// Whether the compressed representation was adopted.
        has_gzip: bool,
    },
}

impl CacheEvent {
    /// The channel this event belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            CacheEvent::Error { .. } => EventKind::Error,
            CacheEvent::Compress { .. } => EventKind::Compress,
        }
    }
}

// == Listener Handle ==
/// Opaque token returned by [`EventBus::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle(u64);

type Listener = Arc<dyn Fn(&CacheEvent) + Send + Sync>;

// == Event Bus ==
/// Per-cache listener registry and dispatcher.
#[derive(Default)]
pub struct EventBus {
    inner: Mutex<Registry>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(ListenerHandle, EventKind, Listener)>,
}

impl EventBus {
    // == Constructor ==
    /// Creates a bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    // == On ==
    /// Registers a listener for one channel.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerHandle
    where
        F: Fn(&CacheEvent) + Send + Sync + 'static,
    {
        let mut registry = self.inner.lock().expect("event bus lock poisoned");
        registry.next_id += 1;
        let handle = ListenerHandle(registry.next_id);
        registry.listeners.push((handle, kind, Arc::new(listener)));
        handle
    }

    // == Off ==
    /// Removes a listener. Returns false if the handle was already removed.
    pub fn off(&self, handle: ListenerHandle) -> bool {
        let mut registry = self.inner.lock().expect("event bus lock poisoned");
        let before = registry.listeners.len();
        registry.listeners.retain(|(h, _, _)| *h != handle);
        registry.listeners.len() != before
    }

    // == Emit ==
    /// Delivers an event to every listener on its channel.
    ///
    /// The matching listeners are snapshotted under the lock and invoked
    /// after it is released, so a listener may call `on`/`off` freely.
    pub fn emit(&self, event: &CacheEvent) {
        let kind = event.kind();
        let snapshot: Vec<Listener> = {
            let registry = self.inner.lock().expect("event bus lock poisoned");
            registry
                .listeners
                .iter()
                .filter(|(_, k, _)| *k == kind)
                .map(|(_, _, l)| Arc::clone(l))
                .collect()
        };

        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of listeners currently registered on a channel.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        let registry = self.inner.lock().expect("event bus lock poisoned");
        registry.listeners.iter().filter(|(_, k, _)| *k == kind).count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("error_listeners", &self.listener_count(EventKind::Error))
            .field("compress_listeners", &self.listener_count(EventKind::Compress))
            .finish()
    }
}
