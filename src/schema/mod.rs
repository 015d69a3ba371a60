//! Schema Module
//!
//! Declares, compiles, and evaluates the validation rules a cache may carry.
//! A schema is optional; without one, validation is a no-op.

mod compile;
mod node;
mod validate;


// Re-export public types
pub use compile::{CompiledRule, CompiledSchema, WildcardPattern};
pub use node::{SchemaDecl, SchemaNode, ValueKind};
pub use validate::SchemaViolation;
