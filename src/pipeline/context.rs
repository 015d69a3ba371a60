//! Operation Context Module
//!
//! The ephemeral record handed to the before-operation hook and attached to
//! events. One is built per call and discarded after dispatch.

use serde_json::Value;

// == Operation ==
/// Which pipeline operation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Set,
    Del,
    MSet,
    MGet,
    MDel,
    Ttl,
    Exists,
    Keys,
    Reset,
}

impl Operation {
    /// Lowercase operation name, as reported in contexts and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Del => "del",
            Operation::MSet => "mset",
            Operation::MGet => "mget",
            Operation::MDel => "mdel",
            Operation::Ttl => "ttl",
            Operation::Exists => "exists",
            Operation::Keys => "keys",
            Operation::Reset => "reset",
        }
    }
}

// == Operation Context ==
/// Full context for one store call.
///
/// `key` is set for singular operations, `keys` for batched ones. Values are
/// only present where the operation carries one: `raw_value` is the caller's
/// original data (or the parsed result on reads), `value` the serialized
/// string actually exchanged with the store.
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub operation: Operation,
    pub key: Option<String>,
    pub keys: Vec<String>,
    pub raw_value: Option<Value>,
    pub value: Option<String>,
    pub ttl: Option<u64>,
}

impl OperationContext {
    /// Context for a value-less singular operation (del, ttl, exists...).
    pub fn bare(operation: Operation, key: &str) -> Self {
        Self {
            operation,
            key: Some(key.to_string()),
            keys: Vec::new(),
            raw_value: None,
            value: None,
            ttl: None,
        }
    }

    /// Context for a value-less batched operation.
    pub fn batch(operation: Operation, keys: &[String]) -> Self {
        Self {
            operation,
            key: None,
            keys: keys.to_vec(),
            raw_value: None,
            value: None,
            ttl: None,
        }
    }

    /// Context for an operation with no key at all (reset, keys).
    pub fn keyless(operation: Operation) -> Self {
        Self {
            operation,
            key: None,
            keys: Vec::new(),
            raw_value: None,
            value: None,
            ttl: None,
        }
    }
}
