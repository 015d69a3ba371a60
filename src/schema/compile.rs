//! Schema Compiler Module
//!
//! Turns a raw schema declaration into the ordered matching structure used at
//! validation time. Compilation happens once, at cache construction, and the
//! result is immutable afterwards.
//!
//! Ordering invariant: literal patterns are held in a map for exact lookup;
//! wildcard patterns are kept in a list sorted by descending literal-character
//! count, so the most specific wildcard is tried first and a bare `*`
//! catch-all (zero literal characters) is tried last.

use std::collections::HashMap;

use regex::Regex;

use crate::schema::node::{SchemaDecl, SchemaNode, ValueKind};

// == Key Pattern ==
/// A compiled wildcard key pattern.
///
/// `*` in the source pattern matches any run of characters; everything else
/// matches literally. The whole key must match (the pattern is anchored).
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    /// The pattern as declared, e.g. `bar*`.
    pub source: String,
    /// Number of non-`*` characters; higher wins on priority.
    pub literal_len: usize,
    /// Anchored matcher with `*` expanded to `.*`.
    regex: Regex,
}

impl WildcardPattern {
    /// Compiles a wildcard pattern string.
    ///
    /// Non-`*` characters are regex-escaped, so the resulting expression is
    /// always valid.
    pub fn new(source: &str) -> Self {
        let parts: Vec<String> = source.split('*').map(|p| regex::escape(p)).collect();
        let expr = format!("^{}$", parts.join(".*"));
        let regex = Regex::new(&expr).expect("escaped pattern is always a valid regex");
        Self {
            source: source.to_string(),
            literal_len: source.chars().filter(|c| *c != '*').count(),
            regex,
        }
    }

    /// Checks whether this pattern accepts the given key.
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

// == Compiled Rule ==
/// A validation rule after compilation.
///
/// The declaration's optional `type` collapses to a concrete [`ValueKind`]
/// (absent means `Any`), and a `properties` map becomes a nested rule set.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub kind: ValueKind,
    pub max_ttl: Option<u64>,
    pub properties: Option<CompiledSchema>,
}

// == Compiled Schema ==
/// An ordered, immutable rule set.
#[derive(Debug, Clone, Default)]
pub struct CompiledSchema {
    /// Exact-match rules; lookup order among literals is irrelevant.
    literals: HashMap<String, CompiledRule>,
    /// Wildcard rules, most literal characters first.
    wildcards: Vec<(WildcardPattern, CompiledRule)>,
}

impl CompiledSchema {
    // == Compile ==
    /// Compiles a raw schema declaration.
    ///
    /// Any input shape is accepted; an empty declaration compiles to an empty
    /// rule set, which makes validation a no-op.
    pub fn compile(decl: &SchemaDecl) -> Self {
        let mut literals = HashMap::new();
        let mut wildcards = Vec::new();

        for (pattern, node) in decl {
            let rule = compile_rule(node);
            // Wildcard detection is purely syntactic.
            if pattern.contains('*') {
                wildcards.push((WildcardPattern::new(pattern), rule));
            } else {
                literals.insert(pattern.clone(), rule);
            }
        }

        // Most specific wildcard first; bare `*` sorts last.
        wildcards.sort_by(|a, b| b.0.literal_len.cmp(&a.0.literal_len));

        Self { literals, wildcards }
    }

    // == Resolve ==
    /// Finds the rule governing a key: exact literal match first, then the
    /// highest-priority wildcard that accepts the key.
    pub fn resolve(&self, key: &str) -> Option<&CompiledRule> {
        if let Some(rule) = self.literals.get(key) {
            return Some(rule);
        }
        self.wildcards
            .iter()
            .find(|(pattern, _)| pattern.matches(key))
            .map(|(_, rule)| rule)
    }

    /// Returns true if the schema declares no rules at all.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.wildcards.is_empty()
    }

    /// Number of declared rules.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.literals.len() + self.wildcards.len()
    }
}

/// Compiles a single declaration node, recursing into `properties`.
fn compile_rule(node: &SchemaNode) -> CompiledRule {
    CompiledRule {
        kind: node.kind.unwrap_or(ValueKind::Any),
        max_ttl: node.max_ttl,
        properties: node.properties.as_ref().map(CompiledSchema::compile),
    }
}
