//! Rulesheet synchronization engine
//!
//! Mirrors rulesheet content into one remote project per rulesheet. The
//! write path assembles a single atomic commit of five files (VERSION,
//! CI script, features, parameters, rules); the read path rehydrates a
//! rulesheet from those files.

mod engine;
mod resolver;
mod version;

use async_trait::async_trait;

use crate::config::RemoteConfig;
use crate::error::Result;
use crate::rulesheet::Rulesheet;

pub use engine::GitlabSynchronizer;
pub use resolver::resolve_project;
pub use version::reconcile_version;

/// Commit message for the first synchronizing write of a rulesheet
pub const CREATE_COMMIT_MESSAGE: &str = "[FEATWS BOT] Create Repo";
/// Commit message for subsequent synchronizing writes
pub const UPDATE_COMMIT_MESSAGE: &str = "[FEATWS BOT] Update Repo";

/// File names persisted in every rulesheet project
pub const VERSION_FILE: &str = "VERSION";
pub const CI_FILE: &str = ".gitlab-ci.yml";
pub const FEATURES_FILE: &str = "features.json";
pub const PARAMETERS_FILE: &str = "parameters.json";
pub const RULES_FILE: &str = "rules.json";
/// Legacy text rules; read-only, parsed when `rules.json` is absent
pub const LEGACY_RULES_FILE: &str = "rules.featws";

/// Seam between the service and the remote repository
///
/// Keeping this behind a trait lets alternative write strategies (CAS on
/// VERSION, outbox reconciliation) drop in without touching the service.
#[async_trait]
pub trait Synchronizer: Send + Sync {
    /// Mirror the rulesheet into its remote project with one commit
    ///
    /// Mutates `rulesheet.version` to the newly committed VERSION.
    async fn push(&self, rulesheet: &mut Rulesheet, message: &str) -> Result<()>;

    /// Rehydrate rule content from the remote project into the rulesheet
    async fn pull(&self, rulesheet: &mut Rulesheet) -> Result<()>;
}

/// No-op synchronizer used when no remote credential is configured
///
/// Every operation succeeds without touching the network; the service
/// degrades to SQL-only. This is a documented mode, not an error.
pub struct DisabledSynchronizer;

#[async_trait]
impl Synchronizer for DisabledSynchronizer {
    async fn push(&self, rulesheet: &mut Rulesheet, _message: &str) -> Result<()> {
        tracing::debug!(slug = %rulesheet.slug, "synchronization disabled, skipping push");
        Ok(())
    }

    async fn pull(&self, rulesheet: &mut Rulesheet) -> Result<()> {
        tracing::debug!(slug = %rulesheet.slug, "synchronization disabled, skipping pull");
        Ok(())
    }
}

/// Build the synchronizer matching the configuration
pub fn build_synchronizer(config: &RemoteConfig) -> Result<Box<dyn Synchronizer>> {
    if config.is_enabled() {
        Ok(Box::new(GitlabSynchronizer::new(config.clone())?))
    } else {
        tracing::info!("no remote token configured, synchronization disabled");
        Ok(Box::new(DisabledSynchronizer))
    }
}
