//! Row models for the rulesheets table

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A persisted rulesheet metadata row
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct RulesheetRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new rulesheet
#[derive(Debug, Clone)]
pub struct NewRulesheet {
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
}
