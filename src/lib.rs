//! Cachegate - a caching layer over interchangeable backends
//!
//! Wraps any [`store::Store`] with schema validation, operation hooks,
//! event emission, and optional transparent compression.

pub mod config;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod schema;
pub mod store;
pub mod tasks;

pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use events::{CacheEvent, ErrorCause, EventKind, ListenerHandle};
pub use pipeline::{Cache, Operation, OperationContext, SetOptions, WriteHandle, COMPRESSION_MARKER};
pub use schema::{SchemaDecl, SchemaNode, SchemaViolation, ValueKind};
pub use store::{MemoryStore, Store, WriteOptions};
pub use tasks::spawn_sweep_task;
