//! Rulesheet service orchestration

use featws_store::{NewRulesheet, Page, RulesheetFilter, RulesheetStore};

use crate::error::Result;
use crate::rulesheet::Rulesheet;
use crate::sync::{Synchronizer, CREATE_COMMIT_MESSAGE, UPDATE_COMMIT_MESSAGE};

/// Coordinates the SQL store and the synchronization engine
///
/// The store owns relational metadata; the synchronizer owns rule
/// content. Writes hit SQL first, then the remote; a failed commit does
/// not roll the SQL row back.
pub struct RulesheetService {
    store: RulesheetStore,
    sync: Box<dyn Synchronizer>,
}

impl RulesheetService {
    pub fn new(store: RulesheetStore, sync: Box<dyn Synchronizer>) -> Self {
        Self { store, sync }
    }

    /// Create a rulesheet: SQL insert, then the initial synchronizing
    /// commit
    ///
    /// Fills `id` and `version` back into the payload. A SQL failure
    /// aborts before any remote action.
    pub async fn create(&self, rulesheet: &mut Rulesheet) -> Result<()> {
        rulesheet.validate()?;
        rulesheet.ensure_slug();
        rulesheet.refresh_string_rule_flag();

        let row = self
            .store
            .insert(&NewRulesheet {
                name: rulesheet.name.clone(),
                description: rulesheet.description.clone(),
                slug: rulesheet.slug.clone(),
            })
            .await?;
        rulesheet.id = row.id as u64;

        self.sync.push(rulesheet, CREATE_COMMIT_MESSAGE).await?;
        Ok(())
    }

    /// Fetch one rulesheet by id, rehydrated from its remote project
    pub async fn get(&self, id: u64) -> Result<Option<Rulesheet>> {
        let Some(row) = self.store.get(id as i64).await? else {
            return Ok(None);
        };

        let mut rulesheet = Rulesheet::from_row(&row);
        self.sync.pull(&mut rulesheet).await?;
        Ok(Some(rulesheet))
    }

    /// Update a rulesheet: SQL update, then a synchronizing commit
    ///
    /// Returns false when no row matched the id. The slug is immutable;
    /// the persisted value is authoritative for the remote project path.
    pub async fn update(&self, rulesheet: &mut Rulesheet) -> Result<bool> {
        rulesheet.validate()?;
        rulesheet.refresh_string_rule_flag();

        let Some(row) = self
            .store
            .update(
                rulesheet.id as i64,
                &rulesheet.name,
                rulesheet.description.as_deref(),
            )
            .await?
        else {
            return Ok(false);
        };
        rulesheet.slug = row.slug;

        self.sync.push(rulesheet, UPDATE_COMMIT_MESSAGE).await?;
        Ok(true)
    }

    /// Delete the SQL row; the remote project is retained
    pub async fn delete(&self, id: u64) -> Result<bool> {
        Ok(self.store.delete(id as i64).await?)
    }

    /// List rulesheets matching the filter, each rehydrated as in `get`
    pub async fn find(&self, filter: &RulesheetFilter, page: Page) -> Result<Vec<Rulesheet>> {
        let rows = self.store.find(filter, page).await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut rulesheet = Rulesheet::from_row(row);
            self.sync.pull(&mut rulesheet).await?;
            results.push(rulesheet);
        }
        Ok(results)
    }

    /// Count rulesheets matching the filter, ignoring pagination
    pub async fn count(&self, filter: &RulesheetFilter) -> Result<i64> {
        Ok(self.store.count(filter).await?)
    }
}
