//! Environment-based configuration

use featws_core::RemoteConfig;

use crate::auth::AuthMode;
use crate::error::{Error, Result};

/// Runtime configuration of the API process
///
/// Every value comes from the environment; `.env` files are honored by
/// the binary before this is read. A blank `GITLAB_TOKEN` disables
/// synchronization and the service runs SQL-only.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    /// Comma-separated allowed CORS origins; `*` allows any
    pub allow_origins: String,
    pub database_url: String,
    /// Host announced to external callers
    pub external_host: String,
    /// ORed authentication chain
    pub auth_modes: Vec<AuthMode>,
    /// Secret compared against `X-API-Key`
    pub api_key: String,
    /// JWKS endpoint for the `openam` mode
    pub openam_url: String,
    pub remote: RemoteConfig,
}

impl ApiConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        let port = env_or("PORT", "8080")
            .parse()
            .map_err(|_| Error::config("PORT must be a number"))?;

        Ok(Self {
            port,
            allow_origins: env_or("ALLOW_ORIGINS", "*"),
            database_url: env_or("DATABASE_URL", "sqlite://featws.db"),
            external_host: env_or("EXTERNAL_HOST", "localhost"),
            auth_modes: AuthMode::parse_chain(&env_or("AUTH_MODE", "none"))?,
            api_key: env_or("API_KEY", ""),
            openam_url: env_or("OPENAM_URL", ""),
            remote: RemoteConfig {
                token: env_or("GITLAB_TOKEN", ""),
                url: env_or("GITLAB_URL", "https://gitlab.com"),
                namespace: env_or("GITLAB_NAMESPACE", ""),
                prefix: env_or("GITLAB_PREFIX", ""),
                default_branch: env_or("GITLAB_DEFAULT_BRANCH", "main"),
                ci_script: env_or("GITLAB_CI_SCRIPT", ""),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
