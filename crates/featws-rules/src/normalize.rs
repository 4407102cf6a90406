//! Rule-tree normalization
//!
//! Converts the untyped JSON rules payload into the canonical
//! [`RuleValue`] tree before `rules.json` is marshaled. Normalization is
//! idempotent: applying it to already-normalized output is a no-op.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::value::{LeafRule, RuleValue};

/// Recursively canonicalize an untyped JSON value into a rule-tree
///
/// Dispatch is on dynamic shape:
/// - lists normalize element-wise,
/// - a map containing a `value` key becomes a [`LeafRule`] carrying the
///   recognized keys (`condition`, `value`, `dynamic`, `type`) that are
///   present — any other keys are dropped,
/// - other maps recurse entry-wise,
/// - scalars pass through unchanged.
pub fn normalize(value: &Value) -> RuleValue {
    match value {
        Value::Null => RuleValue::Null,
        Value::Bool(b) => RuleValue::Bool(*b),
        Value::Number(n) => RuleValue::Number(n.clone()),
        Value::String(s) => RuleValue::String(s.clone()),
        Value::Array(items) => RuleValue::List(items.iter().map(normalize).collect()),
        Value::Object(entries) => {
            if let Some(leaf_value) = entries.get("value") {
                RuleValue::Leaf(LeafRule {
                    condition: entries.get("condition").map(|v| Box::new(normalize(v))),
                    value: Box::new(normalize(leaf_value)),
                    dynamic: entries.get("dynamic").map(|v| Box::new(normalize(v))),
                    rule_type: entries.get("type").map(|v| Box::new(normalize(v))),
                })
            } else {
                RuleValue::Map(
                    entries
                        .iter()
                        .map(|(k, v)| (k.clone(), normalize(v)))
                        .collect(),
                )
            }
        }
    }
}

/// Normalize every entry of a top-level rules mapping
pub fn normalize_rules(rules: &Map<String, Value>) -> BTreeMap<String, RuleValue> {
    rules
        .iter()
        .map(|(name, v)| (name.clone(), normalize(v)))
        .collect()
}

/// Detect the degenerate string-rule mode
///
/// True iff every value of the top-level mapping is a primitive string.
/// Computed on the inbound payload before normalization; when true, the
/// normalizer is not invoked and rules round-trip as a flat mapping.
pub fn has_string_rule(rules: &Map<String, Value>) -> bool {
    rules.values().all(Value::is_string)
}
