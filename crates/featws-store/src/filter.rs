//! List filters and pagination

use sqlx::{QueryBuilder, Sqlite};

use crate::error::{Error, Result};

/// Whitelisted filter over rulesheet rows
///
/// Built from untyped query parameters; unknown fields are rejected
/// before any SQL is assembled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulesheetFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl RulesheetFilter {
    /// Build a filter from untyped `key=value` parameters
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFilter`] for unknown keys or an `id` that
    /// is not a decimal integer.
    pub fn from_params<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut filter = Self::default();
        for (key, value) in params {
            match key {
                "id" => {
                    filter.id = Some(value.parse().map_err(|_| Error::InvalidFilter {
                        field: format!("id={value}"),
                    })?);
                }
                "name" => filter.name = Some(value.to_string()),
                "slug" => filter.slug = Some(value.to_string()),
                other => {
                    return Err(Error::InvalidFilter {
                        field: other.to_string(),
                    });
                }
            }
        }
        Ok(filter)
    }

    /// Append WHERE clauses for every set field, binding all values
    pub(crate) fn apply(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        let mut separator = " WHERE ";

        if let Some(id) = self.id {
            builder.push(separator).push("id = ").push_bind(id);
            separator = " AND ";
        }
        if let Some(name) = &self.name {
            builder.push(separator).push("name = ").push_bind(name.clone());
            separator = " AND ";
        }
        if let Some(slug) = &self.slug {
            builder.push(separator).push("slug = ").push_bind(slug.clone());
        }
    }
}

/// Pagination window for list queries
///
/// Pagination is disabled when either `limit` or `page` is 0; the full
/// filtered set is returned in that case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub page: i64,
}

impl Page {
    pub fn new(limit: i64, page: i64) -> Self {
        Self { limit, page }
    }

    /// True when both limit and page are positive
    pub fn is_enabled(&self) -> bool {
        self.limit > 0 && self.page > 0
    }

    /// Row offset of the first item on this page
    pub fn offset(&self) -> i64 {
        self.limit * (self.page - 1)
    }
}
