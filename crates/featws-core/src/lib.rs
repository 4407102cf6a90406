//! Core orchestration layer for the rulesheet service
//!
//! This crate coordinates the leaf crates into the rulesheet
//! synchronization core:
//!
//! - **Rulesheet DTO**: the aggregate exchanged with callers
//! - **Sync engine**: project resolution, VERSION reconciliation, and the
//!   atomic five-file commit that mirrors a rulesheet into its remote
//!   project
//! - **Service**: Create/Get/Update/Delete/Find/Count over the SQL store
//!   and the sync engine
//!
//! # Architecture
//!
//! ```text
//!                REST API
//!                    |
//!               featws-core
//!                    |
//!      +-------------+-------------+
//!      |             |             |
//! featws-rules  featws-gitlab  featws-store
//! ```
//!
//! The SQL store is the source of truth for metadata; the remote project
//! is the source of truth for rule content.

pub mod config;
pub mod error;
pub mod rulesheet;
pub mod service;
pub mod sync;

pub use config::RemoteConfig;
pub use error::{Error, Result};
pub use rulesheet::{FindResult, PropertyMap, Rulesheet};
pub use service::RulesheetService;
pub use sync::{
    build_synchronizer, DisabledSynchronizer, GitlabSynchronizer, Synchronizer,
    CREATE_COMMIT_MESSAGE, UPDATE_COMMIT_MESSAGE,
};
