//! Pipeline Module
//!
//! The operation pipeline wrapping a backing store, plus the compression
//! framing and the per-call operation context.

mod cache;
mod compress;
mod context;
mod writer;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use cache::{Cache, SetOptions};
pub use compress::COMPRESSION_MARKER;
pub use context::{Operation, OperationContext};
pub use writer::WriteHandle;
