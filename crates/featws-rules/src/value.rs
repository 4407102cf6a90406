//! Rule-tree value types
//!
//! A rule-tree is the canonical structured representation of rulesheet
//! rule content. The distinguished form is the *leaf rule*: a map whose
//! `value` key marks it as `{ condition?, value, dynamic?, type? }`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A node in the rule-tree
///
/// Serializes to plain JSON: scalars as themselves, lists as arrays,
/// maps as objects, and leaf rules as objects carrying only the leaf
/// keys that are present.
///
/// Variant order matters for deserialization: [`LeafRule`] is tried
/// before the generic map so that any object containing a `value` key
/// is read as a leaf rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// JSON null
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Numeric scalar
    Number(Number),
    /// String scalar
    String(String),
    /// Ordered sequence of rule-tree values
    List(Vec<RuleValue>),
    /// A map containing `value`: the leaf-rule form
    Leaf(LeafRule),
    /// Generic mapping from string to rule-tree value
    Map(BTreeMap<String, RuleValue>),
}

impl RuleValue {
    /// True if this node is a scalar (null, bool, number, or string)
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            RuleValue::Null | RuleValue::Bool(_) | RuleValue::Number(_) | RuleValue::String(_)
        )
    }

    /// Borrow the leaf rule if this node is one
    pub fn as_leaf(&self) -> Option<&LeafRule> {
        match self {
            RuleValue::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }
}

impl From<&str> for RuleValue {
    fn from(s: &str) -> Self {
        RuleValue::String(s.to_string())
    }
}

impl From<String> for RuleValue {
    fn from(s: String) -> Self {
        RuleValue::String(s)
    }
}

/// The leaf-rule record
///
/// The presence of `value` discriminates a leaf rule from a generic map.
/// Only keys present on the input survive serialization, so a round-trip
/// never invents `condition`, `dynamic`, or `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafRule {
    /// Guard expression evaluated before the value applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Box<RuleValue>>,

    /// The rule result; required
    pub value: Box<RuleValue>,

    /// Marks the value as dynamically resolved by the evaluation engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<Box<RuleValue>>,

    /// Declared result type hint
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rule_type: Option<Box<RuleValue>>,
}

impl LeafRule {
    /// Create a leaf rule carrying only a value
    pub fn new(value: RuleValue) -> Self {
        Self {
            condition: None,
            value: Box::new(value),
            dynamic: None,
            rule_type: None,
        }
    }
}
