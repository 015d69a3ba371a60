//! Schema Validator Module
//!
//! Checks a candidate value against the compiled rule set before it is
//! written. Violations are reported, never enforced: the pipeline turns them
//! into `error` events and lets the write proceed.

use serde_json::Value;
use thiserror::Error;

use crate::schema::compile::CompiledSchema;
use crate::schema::node::{kind_of, ValueKind};

// == Schema Violation ==
/// A single validation failure, carrying the path at which it occurred.
///
/// Paths are dotted: the top-level key, extended with `.<subkey>` for each
/// level of object recursion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    /// No literal or wildcard rule resolves for the key at this path.
    #[error("No schema rule matches \"{path}\"")]
    NoMatchingRule { path: String },

    /// The write's TTL exceeds the rule's declared bound.
    #[error("TTL {ttl}s exceeds the maximum of {max_ttl}s for \"{path}\"")]
    TtlExceeded { path: String, ttl: u64, max_ttl: u64 },

    /// The value's kind does not match the rule's declared type.
    #[error("Expected {expected} at \"{path}\", got {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl SchemaViolation {
    /// The path at which the violation occurred.
    pub fn path(&self) -> &str {
        match self {
            SchemaViolation::NoMatchingRule { path }
            | SchemaViolation::TtlExceeded { path, .. }
            | SchemaViolation::TypeMismatch { path, .. } => path,
        }
    }
}

impl CompiledSchema {
    // == Validate ==
    /// Validates a value about to be stored under `key`.
    ///
    /// Checks, in order: rule resolution, TTL bound, value kind, and child
    /// rules for object values. Recursion walks the **value's** keys, not the
    /// schema's, so a sparse object passes while an undeclared field still
    /// has to resolve against a rule (a nested wildcard or nothing).
    ///
    /// Null values skip the kind check but still require a resolvable rule,
    /// which is what makes optional declared fields work.
    pub fn validate(
        &self,
        key: &str,
        value: &Value,
        ttl: Option<u64>,
    ) -> std::result::Result<(), SchemaViolation> {
        self.validate_at(key, value, key, ttl)
    }

    fn validate_at(
        &self,
        key: &str,
        value: &Value,
        path: &str,
        ttl: Option<u64>,
    ) -> std::result::Result<(), SchemaViolation> {
        let rule = self.resolve(key).ok_or_else(|| SchemaViolation::NoMatchingRule {
            path: path.to_string(),
        })?;

        if let (Some(ttl), Some(max_ttl)) = (ttl, rule.max_ttl) {
            if ttl > max_ttl {
                return Err(SchemaViolation::TtlExceeded {
                    path: path.to_string(),
                    ttl,
                    max_ttl,
                });
            }
        }

        // Null skips the kind check; a rule still had to resolve above.
        if value.is_null() {
            return Ok(());
        }

        if rule.kind != ValueKind::Any && !rule.kind.accepts(value) {
            return Err(SchemaViolation::TypeMismatch {
                path: path.to_string(),
                expected: rule.kind.name(),
                actual: kind_of(value),
            });
        }

        // Object rules without `properties` accept any shape.
        if let (ValueKind::Object, Some(children)) = (rule.kind, rule.properties.as_ref()) {
            if let Some(fields) = value.as_object() {
                for (subkey, subvalue) in fields {
                    let subpath = format!("{path}.{subkey}");
                    children.validate_at(subkey, subvalue, &subpath, ttl)?;
                }
            }
        }

        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::node::SchemaDecl;
    use serde_json::json;

    /// The reference schema: a literal string rule with a TTL bound, a
    /// wildcard object rule with nested properties, and a wildcard object
    /// rule without properties.
    fn reference_schema() -> CompiledSchema {
        let decl: SchemaDecl = serde_json::from_value(json!({
            "foo": { "type": "string", "maxTTL": 60 },
            "bar*": { "type": "object", "properties": { "name": { "type": "string" } } },
            "ben*": { "type": "object" }
        }))
        .unwrap();
        CompiledSchema::compile(&decl)
    }

    #[test]
    fn test_type_mismatch_on_literal_rule() {
        let schema = reference_schema();
        let err = schema.validate("foo", &json!(1), None).unwrap_err();
        assert!(matches!(err, SchemaViolation::TypeMismatch { .. }));
        assert_eq!(err.path(), "foo");
    }

    #[test]
    fn test_ttl_exceeded() {
        let schema = reference_schema();
        let err = schema.validate("foo", &json!("1"), Some(70)).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::TtlExceeded {
                path: "foo".to_string(),
                ttl: 70,
                max_ttl: 60
            }
        );
    }

    #[test]
    fn test_ttl_at_bound_passes() {
        let schema = reference_schema();
        assert!(schema.validate("foo", &json!("1"), Some(60)).is_ok());
    }

    #[test]
    fn test_nested_type_mismatch() {
        let schema = reference_schema();
        let err = schema
            .validate("barxxx", &json!({"name": 1}), None)
            .unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::TypeMismatch {
                path: "barxxx.name".to_string(),
                expected: "string",
                actual: "number"
            }
        );
    }

    #[test]
    fn test_nested_valid_object() {
        let schema = reference_schema();
        assert!(schema.validate("barxxx", &json!({"name": "1"}), None).is_ok());
    }

    #[test]
    fn test_object_rule_without_properties_skips_recursion() {
        let schema = reference_schema();
        assert!(schema
            .validate("benxxx", &json!({"x": 1, "y": 2}), None)
            .is_ok());
    }

    #[test]
    fn test_no_matching_rule() {
        let schema = reference_schema();
        let err = schema.validate("ban", &json!(1), None).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::NoMatchingRule {
                path: "ban".to_string()
            }
        );
    }

    #[test]
    fn test_undeclared_nested_field_is_a_violation() {
        let schema = reference_schema();
        let err = schema
            .validate("barxxx", &json!({"name": "x", "extra": 1}), None)
            .unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::NoMatchingRule {
                path: "barxxx.extra".to_string()
            }
        );
    }

    #[test]
    fn test_nested_wildcard_catches_extra_fields() {
        let decl: SchemaDecl = serde_json::from_value(json!({
            "u*": { "type": "object", "properties": {
                "name": { "type": "string" },
                "*": {}
            }}
        }))
        .unwrap();
        let schema = CompiledSchema::compile(&decl);

        assert!(schema
            .validate("u1", &json!({"name": "x", "extra": 1}), None)
            .is_ok());
        // The declared rule still applies where it matches.
        assert!(schema
            .validate("u1", &json!({"name": 1}), None)
            .is_err());
    }

    #[test]
    fn test_untyped_rule_accepts_any_value() {
        let decl: SchemaDecl = serde_json::from_value(json!({ "k": {} })).unwrap();
        let schema = CompiledSchema::compile(&decl);

        for v in [json!(1), json!("s"), json!(true), json!([1]), json!({"a": 1})] {
            assert!(schema.validate("k", &v, None).is_ok());
        }
    }

    // Null policy: skips the kind check (both halves asserted here) but
    // still needs a resolvable rule.
    #[test]
    fn test_null_skips_type_check_but_still_needs_a_rule() {
        let schema = reference_schema();

        // A null where a string is declared passes.
        assert!(schema.validate("foo", &json!(null), None).is_ok());
        // A nested null likewise.
        assert!(schema
            .validate("barxxx", &json!({"name": null}), None)
            .is_ok());
        // But a null under a key with no rule at all is still a violation.
        let err = schema.validate("ban", &json!(null), None).unwrap_err();
        assert!(matches!(err, SchemaViolation::NoMatchingRule { .. }));
    }

    #[test]
    fn test_absent_declared_field_passes() {
        let schema = reference_schema();
        // Recursion walks the value's keys, so a missing declared field is
        // simply never visited.
        assert!(schema.validate("barxxx", &json!({}), None).is_ok());
    }

    #[test]
    fn test_ttl_check_applies_to_nested_rules() {
        let decl: SchemaDecl = serde_json::from_value(json!({
            "s*": { "type": "object", "properties": {
                "token": { "type": "string", "maxTTL": 30 }
            }}
        }))
        .unwrap();
        let schema = CompiledSchema::compile(&decl);

        let err = schema
            .validate("s1", &json!({"token": "t"}), Some(60))
            .unwrap_err();
        assert!(matches!(err, SchemaViolation::TtlExceeded { .. }));
        assert_eq!(err.path(), "s1.token");
    }
}
