//! VERSION reconciliation

use featws_gitlab::{CommitAction, GitlabClient, Project};

use crate::error::{Error, Result};
use crate::sync::VERSION_FILE;

/// Read the persisted VERSION, increment it, and stage the new value
///
/// An absent VERSION file is treated as prior version 0, so the first
/// committed value is 1. The staged action writes the new value followed
/// by a newline.
///
/// # Errors
///
/// Fails when the persisted content does not parse as a decimal integer
/// or the file probe hits a non-404 error.
pub async fn reconcile_version(
    client: &GitlabClient,
    project: &Project,
    branch: &str,
) -> Result<(String, CommitAction)> {
    let current = client.read_string(project, branch, VERSION_FILE).await?;
    let trimmed = current.trim_end_matches('\n');

    let prior: u64 = if trimmed.is_empty() {
        0
    } else {
        trimmed.parse().map_err(|_| Error::InvalidVersion {
            content: trimmed.to_string(),
        })?
    };

    let next = prior + 1;
    let action = client
        .plan_create_or_update(project, branch, VERSION_FILE, format!("{next}\n"))
        .await?;

    Ok((next.to_string(), action))
}
