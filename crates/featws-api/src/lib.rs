//! REST API for the rulesheet service
//!
//! Exposes the rulesheet service over HTTP under `/api/v1`, with an ORed
//! authentication chain, CORS, liveness/readiness probes, and a fixed
//! per-request deadline. All runtime configuration comes from the
//! environment.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod server;

pub use config::ApiConfig;
pub use error::{ApiError, Error, Result};
pub use server::{build_router, build_state, serve, AppState, SharedState};
