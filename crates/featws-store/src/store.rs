//! Rulesheet metadata store over SQLite

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};

use crate::error::Result;
use crate::filter::{Page, RulesheetFilter};
use crate::model::{NewRulesheet, RulesheetRow};

const SELECT_COLUMNS: &str = "SELECT id, name, description, slug, created_at, updated_at FROM rulesheets";

/// Connection pool plus the query surface the service needs
#[derive(Debug, Clone)]
pub struct RulesheetStore {
    pool: SqlitePool,
}

impl RulesheetStore {
    /// Connect to the database at the given URI, creating the file if
    /// needed
    ///
    /// In-memory databases are pinned to a single connection so every
    /// query sees the same database.
    pub async fn connect(uri: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(uri)?.create_if_missing(true);
        let max_connections = if uri.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create the rulesheets table if it does not exist
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS rulesheets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                slug TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        tracing::debug!("rulesheets schema ready");
        Ok(())
    }

    /// Insert a new rulesheet and return the stored row
    pub async fn insert(&self, new: &NewRulesheet) -> Result<RulesheetRow> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO rulesheets (name, description, slug, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.slug)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        Ok(RulesheetRow {
            id,
            name: new.name.clone(),
            description: new.description.clone(),
            slug: new.slug.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetch one rulesheet by id
    pub async fn get(&self, id: i64) -> Result<Option<RulesheetRow>> {
        let row = sqlx::query_as::<_, RulesheetRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Update name and description by id; the slug is immutable
    ///
    /// Returns the updated row, or `None` when no row matched.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<RulesheetRow>> {
        let result = sqlx::query(
            "UPDATE rulesheets SET name = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(name)
        .bind(description)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Delete one rulesheet by id; true when a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM rulesheets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List rulesheets matching the filter, optionally paginated
    pub async fn find(&self, filter: &RulesheetFilter, page: Page) -> Result<Vec<RulesheetRow>> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        filter.apply(&mut builder);
        builder.push(" ORDER BY id");

        if page.is_enabled() {
            builder.push(" LIMIT ").push_bind(page.limit);
            builder.push(" OFFSET ").push_bind(page.offset());
        }

        let rows = builder
            .build_query_as::<RulesheetRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Count rulesheets matching the filter, ignoring pagination
    pub async fn count(&self, filter: &RulesheetFilter) -> Result<i64> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM rulesheets");
        filter.apply(&mut builder);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Cheap connectivity probe for readiness checks
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
