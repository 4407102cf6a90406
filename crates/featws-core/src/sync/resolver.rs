//! Remote project resolution

use featws_gitlab::{GitlabClient, Project};

use crate::config::RemoteConfig;
use crate::error::{Error, Result};

/// Locate the remote project of a rulesheet
///
/// The project lives at `<namespace>/<prefix><slug>` on the configured
/// host. With `create_missing`, an absent project is created under the
/// namespace before any file action — the write path relies on this.
/// Read paths resolve without creation and fail on absence.
///
/// # Errors
///
/// Namespace lookup failures and non-404 project errors propagate.
pub async fn resolve_project(
    client: &GitlabClient,
    config: &RemoteConfig,
    slug: &str,
    create_missing: bool,
) -> Result<Project> {
    let namespace = client.get_namespace(&config.namespace).await?;
    let project_name = config.project_name(slug);
    let path = format!("{}/{}", namespace.full_path, project_name);

    match client.get_project(&path).await {
        Ok(project) => Ok(project),
        Err(e) if e.is_not_found() && create_missing => {
            tracing::info!(project = %path, "remote project missing, creating");
            Ok(client.create_project(&project_name, namespace.id).await?)
        }
        Err(e) if e.is_not_found() => Err(Error::NotFound {
            resource: format!("remote project {path}"),
        }),
        Err(e) => Err(e.into()),
    }
}
