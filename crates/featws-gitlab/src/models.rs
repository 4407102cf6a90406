//! GitLab API request and response models
//!
//! Only the fields the synchronization core reads are deserialized;
//! everything else in the API payloads is ignored.

use serde::{Deserialize, Serialize};

/// A GitLab namespace (group or user)
#[derive(Debug, Clone, Deserialize)]
pub struct Namespace {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Full path used to address projects under this namespace
    pub full_path: String,
}

/// A GitLab project
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path_with_namespace: String,
    #[serde(default)]
    pub web_url: String,
}

/// A repository file as returned by the files endpoint
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RepositoryFile {
    #[serde(default)]
    pub file_path: String,
    /// Base64-encoded content
    pub content: String,
}

/// Whether a commit action creates a new file or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Create,
    Update,
}

/// One file-level action inside a commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitAction {
    pub action: FileAction,
    pub file_path: String,
    pub content: String,
}

impl CommitAction {
    pub fn create(file_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            action: FileAction::Create,
            file_path: file_path.into(),
            content: content.into(),
        }
    }

    pub fn update(file_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            action: FileAction::Update,
            file_path: file_path.into(),
            content: content.into(),
        }
    }
}

/// Commit creation request body
#[derive(Debug, Serialize)]
pub(crate) struct CommitRequest<'a> {
    pub branch: &'a str,
    pub commit_message: &'a str,
    pub actions: &'a [CommitAction],
}

/// A created commit
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub id: String,
    #[serde(default)]
    pub short_id: String,
    #[serde(default)]
    pub title: String,
}

/// A CI pipeline summary
#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    pub status: String,
    #[serde(default)]
    pub web_url: String,
}
