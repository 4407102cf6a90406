//! GitLab-backed synchronizer: commit assembly and rehydration

use async_trait::async_trait;
use featws_gitlab::GitlabClient;
use featws_rules::{normalize_rules, parse_rules_file};
use serde_json::Value;

use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::rulesheet::{sort_by_name, PropertyMap, Rulesheet};
use crate::sync::resolver::resolve_project;
use crate::sync::version::reconcile_version;
use crate::sync::{
    Synchronizer, CI_FILE, FEATURES_FILE, LEGACY_RULES_FILE, PARAMETERS_FILE, RULES_FILE,
    VERSION_FILE,
};

/// Synchronizer that mirrors rulesheets into GitLab projects
pub struct GitlabSynchronizer {
    client: GitlabClient,
    config: RemoteConfig,
}

impl GitlabSynchronizer {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = GitlabClient::new(&config.url, &config.token)?;
        Ok(Self { client, config })
    }

    /// Borrow the underlying client, e.g. for readiness probes
    pub fn client(&self) -> &GitlabClient {
        &self.client
    }
}

#[async_trait]
impl Synchronizer for GitlabSynchronizer {
    /// Assemble and emit the atomic five-file commit
    ///
    /// All file actions are planned before anything is written, so the
    /// commit either fully applies or the repository is untouched. The
    /// action order (VERSION, CI, features, parameters, rules) is fixed
    /// for deterministic history; it carries no semantics.
    async fn push(&self, rulesheet: &mut Rulesheet, message: &str) -> Result<()> {
        let branch = &self.config.default_branch;
        let project = resolve_project(&self.client, &self.config, &rulesheet.slug, true).await?;

        let (version, version_action) =
            reconcile_version(&self.client, &project, branch).await?;
        rulesheet.version = version;

        let mut actions = vec![version_action];
        actions.push(
            self.client
                .plan_create_or_update(&project, branch, CI_FILE, self.config.ci_script.clone())
                .await?,
        );
        actions.push(
            self.client
                .plan_create_or_update(
                    &project,
                    branch,
                    FEATURES_FILE,
                    marshal_properties(rulesheet.features.as_deref())?,
                )
                .await?,
        );
        actions.push(
            self.client
                .plan_create_or_update(
                    &project,
                    branch,
                    PARAMETERS_FILE,
                    marshal_properties(rulesheet.parameters.as_deref())?,
                )
                .await?,
        );
        actions.push(
            self.client
                .plan_create_or_update(&project, branch, RULES_FILE, marshal_rules(rulesheet)?)
                .await?,
        );

        self.client
            .create_commit(&project, branch, message, &actions)
            .await?;

        tracing::info!(
            slug = %rulesheet.slug,
            version = %rulesheet.version,
            "rulesheet synchronized"
        );
        Ok(())
    }

    /// Rebuild rule content from the remote project
    ///
    /// Absent files leave the corresponding fields unset. `rules.json`
    /// takes precedence; the legacy text format is parsed only when the
    /// JSON file is empty or missing. The pipeline fetch is best-effort.
    async fn pull(&self, rulesheet: &mut Rulesheet) -> Result<()> {
        let branch = &self.config.default_branch;
        let project = resolve_project(&self.client, &self.config, &rulesheet.slug, false).await?;

        let version = self
            .client
            .read_string(&project, branch, VERSION_FILE)
            .await?;
        rulesheet.version = version.trim_end_matches('\n').to_string();

        let features = self
            .client
            .read_string(&project, branch, FEATURES_FILE)
            .await?;
        if !features.is_empty() {
            rulesheet.features = serde_json::from_str(&features)?;
        }

        let parameters = self
            .client
            .read_string(&project, branch, PARAMETERS_FILE)
            .await?;
        if !parameters.is_empty() {
            rulesheet.parameters = serde_json::from_str(&parameters)?;
        }

        let rules = self
            .client
            .read_string(&project, branch, RULES_FILE)
            .await?;
        if !rules.trim().is_empty() {
            let value: Value = serde_json::from_str(&rules)?;
            rulesheet.rules = if value.is_null() { None } else { Some(value) };
        } else {
            let legacy = self
                .client
                .read_string(&project, branch, LEGACY_RULES_FILE)
                .await?;
            if !legacy.is_empty() {
                let parsed = parse_rules_file(&legacy)?;
                rulesheet.rules = Some(serde_json::to_value(parsed)?);
            }
        }
        rulesheet.refresh_string_rule_flag();

        match self.client.latest_pipeline(&project).await {
            Ok(Some(pipeline)) => {
                rulesheet.pipeline_status = Some(pipeline.status);
                rulesheet.web_url = Some(pipeline.web_url);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(slug = %rulesheet.slug, error = %e, "pipeline status unavailable");
            }
        }

        Ok(())
    }
}

/// Marshal a feature/parameter sequence, sorted by `name`, 2-space indented
///
/// An unset sequence marshals as `null`, matching what rehydration maps
/// back to an unset field.
fn marshal_properties(properties: Option<&[PropertyMap]>) -> Result<String> {
    match properties {
        None => Ok("null".to_string()),
        Some(items) => {
            let mut sorted: Vec<PropertyMap> = items.to_vec();
            sort_by_name(&mut sorted);
            Ok(serde_json::to_string_pretty(&sorted)?)
        }
    }
}

/// Marshal the rules mapping, 2-space indented
///
/// String-rule mode serializes the flat mapping as-is; otherwise every
/// entry is normalized into the canonical rule-tree first.
fn marshal_rules(rulesheet: &Rulesheet) -> Result<String> {
    let Some(rules) = &rulesheet.rules else {
        return Ok("null".to_string());
    };
    let entries = rules
        .as_object()
        .ok_or_else(|| Error::validation("rules"))?;

    if rulesheet.has_string_rule {
        Ok(serde_json::to_string_pretty(entries)?)
    } else {
        Ok(serde_json::to_string_pretty(&normalize_rules(entries))?)
    }
}
