//! Error types for the caching layer
//!
//! Provides unified error handling using thiserror.
//!
//! Only two kinds of failure ever reach a caller: a value that cannot be
//! serialized for storage, and a backend that rejects an operation. Schema
//! violations and parse failures on read are advisory and travel over the
//! event bus instead (see `events`).

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caching layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Value could not be converted to its storable string form.
    /// Fatal to the `set` call that produced it.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid request data (oversized key or value, bad pattern)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backend is full and eviction failed
    #[error("Store full: {0}")]
    StoreFull(String),

    /// The backing store rejected the operation
    #[error("Backend error: {0}")]
    Backend(String),
}

// == Result Type Alias ==
/// Convenience Result type for the caching layer.
pub type Result<T> = std::result::Result<T, CacheError>;
