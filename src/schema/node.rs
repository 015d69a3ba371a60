//! Schema Declaration Module
//!
//! Defines the user-facing shape of a schema: a mapping from key patterns to
//! validation rules. Declarations are plain serde-deserializable data so a
//! schema can be loaded from a JSON document or built in code.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

// == Value Kind ==
/// The kind of value a rule accepts.
///
/// `Any` is the wildcard kind: a declaration without a `type` field compiles
/// to it and it accepts every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Any,
}

impl ValueKind {
    /// Checks whether a JSON value is of this kind.
    ///
    /// `Any` accepts everything, including `null`.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ValueKind::String => value.is_string(),
            ValueKind::Number => value.is_number(),
            ValueKind::Boolean => value.is_boolean(),
            ValueKind::Object => value.is_object(),
            ValueKind::Array => value.is_array(),
            ValueKind::Any => true,
        }
    }

    /// Human-readable name used in violation messages.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::Any => "any",
        }
    }
}

/// Returns the kind name of a JSON value, for violation messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// == Schema Node ==
/// A single declared validation rule.
///
/// Every field is optional: `{}` is a valid rule that matches any value.
/// `properties` is only meaningful when `kind` is `object` and is compiled
/// recursively into a nested rule set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaNode {
    /// Accepted value kind; absent means any.
    #[serde(rename = "type")]
    pub kind: Option<ValueKind>,
    /// Largest TTL (seconds) a write under this rule may carry.
    #[serde(rename = "maxTTL")]
    pub max_ttl: Option<u64>,
    /// Child rules keyed by pattern, for object values.
    pub properties: Option<HashMap<String, SchemaNode>>,
}

impl SchemaNode {
    /// Rule accepting any value, no TTL bound, no children.
    pub fn any() -> Self {
        Self::default()
    }

    /// Rule accepting a single kind.
    pub fn of_kind(kind: ValueKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Sets the TTL bound.
    pub fn with_max_ttl(mut self, seconds: u64) -> Self {
        self.max_ttl = Some(seconds);
        self
    }

    /// Sets the child rules.
    pub fn with_properties(mut self, properties: HashMap<String, SchemaNode>) -> Self {
        self.properties = Some(properties);
        self
    }
}

// == Schema Declaration ==
/// A raw schema: key patterns mapped to rules, as declared by the caller.
pub type SchemaDecl = HashMap<String, SchemaNode>;
