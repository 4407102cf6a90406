//! The rulesheet aggregate

use featws_rules::has_string_rule;
use featws_store::RulesheetRow;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// One feature or parameter entry: a JSON object keyed at least by `name`
pub type PropertyMap = serde_json::Map<String, Value>;

/// The rulesheet aggregate exchanged with callers
///
/// Relational metadata (id, name, description, slug) lives in the SQL
/// store; `version`, `features`, `parameters`, `rules`, and the pipeline
/// fields are populated from the remote project on reads and mirrored to
/// it on writes.
///
/// `rules` is either a flat `name → string` mapping (string-rule mode) or
/// a nested rule-tree; `has_string_rule` reflects which, and the two
/// modes are mutually exclusive per rulesheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rulesheet {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub slug: String,
    pub version: String,
    pub has_string_rule: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<PropertyMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<PropertyMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Value>,
    /// Last-known CI state; read-only to callers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_status: Option<String>,
    /// Last-known pipeline URL; read-only to callers
    #[serde(rename = "webURL", skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

impl Rulesheet {
    /// Build the DTO skeleton from a persisted metadata row
    pub fn from_row(row: &RulesheetRow) -> Self {
        Self {
            id: row.id as u64,
            name: row.name.clone(),
            description: row.description.clone(),
            slug: row.slug.clone(),
            ..Default::default()
        }
    }

    /// Check inbound payload requirements
    ///
    /// `name` is required; `rules`, when present, must be a JSON object
    /// (either mode is a mapping at the top level).
    pub fn validate(&self) -> Result<()> {
        let mut fields = Vec::new();
        if self.name.trim().is_empty() {
            fields.push("name".to_string());
        }
        if let Some(rules) = &self.rules
            && !rules.is_object()
        {
            fields.push("rules".to_string());
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { fields })
        }
    }

    /// Derive the slug from the name when the caller did not supply one
    pub fn ensure_slug(&mut self) {
        if self.slug.trim().is_empty() {
            self.slug = slugify(&self.name);
        }
    }

    /// Recompute `has_string_rule` from the current rules payload
    ///
    /// Runs on the inbound payload before normalization and decides
    /// whether the normalizer is invoked at all.
    pub fn refresh_string_rule_flag(&mut self) {
        self.has_string_rule = self
            .rules
            .as_ref()
            .and_then(Value::as_object)
            .is_some_and(has_string_rule);
    }
}

/// Sort property maps ascending byte-wise by their `name` key
pub(crate) fn sort_by_name(properties: &mut [PropertyMap]) {
    properties.sort_by(|a, b| property_name(a).cmp(property_name(b)));
}

fn property_name(map: &PropertyMap) -> &str {
    map.get("name").and_then(Value::as_str).unwrap_or("")
}

/// URL-safe slug derived from a rulesheet name
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Envelope returned by list queries when only the count is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindResult {
    pub count: i64,
}
