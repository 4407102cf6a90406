//! Shared test utilities for the featws workspace.
//!
//! This crate provides a stateful in-memory GitLab fake served over
//! wiremock, so every crate exercises the real HTTP client against
//! realistic API behavior instead of per-test canned responses. It is a
//! dev-dependency only — never published.

pub mod gitlab;

pub use gitlab::{CommitRecord, FakeGitlab};
