//! GitLab abstraction for the rulesheet service
//!
//! A thin async client over the GitLab v4 REST API, covering exactly the
//! surface synchronization needs: namespace and project lookup, project
//! creation, repository file reads with a distinguishable not-found,
//! multi-action commits against a single branch, and the latest pipeline
//! of a project.
//!
//! The client never interprets rulesheet content; it moves strings and
//! commit actions. Higher layers decide what the files mean.

pub mod client;
pub mod error;
pub mod models;

pub use client::GitlabClient;
pub use error::{Error, Result};
pub use models::{Commit, CommitAction, FileAction, Namespace, Pipeline, Project};
