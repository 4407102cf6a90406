//! Remote repository configuration

/// Configuration of the remote GitLab side of synchronization
///
/// A blank token disables synchronization entirely: the service degrades
/// to SQL-only and every remote operation becomes a successful no-op.
#[derive(Debug, Clone, Default)]
pub struct RemoteConfig {
    /// Private token; blank disables synchronization
    pub token: String,
    /// GitLab host URL
    pub url: String,
    /// Namespace (group) holding all rulesheet projects
    pub namespace: String,
    /// Prefix prepended to the slug to form the project name
    pub prefix: String,
    /// Branch every read and write targets
    pub default_branch: String,
    /// Verbatim content of the `.gitlab-ci.yml` committed per rulesheet
    pub ci_script: String,
}

impl RemoteConfig {
    /// True when a token is configured and synchronization is active
    pub fn is_enabled(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Remote project name for a rulesheet slug: `<prefix><slug>`
    pub fn project_name(&self, slug: &str) -> String {
        format!("{}{}", self.prefix, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_disables_synchronization() {
        let config = RemoteConfig::default();
        assert!(!config.is_enabled());

        let config = RemoteConfig {
            token: "  ".to_string(),
            ..Default::default()
        };
        assert!(!config.is_enabled());
    }

    #[test]
    fn project_name_is_prefix_plus_slug() {
        let config = RemoteConfig {
            prefix: "rulesheet-".to_string(),
            ..Default::default()
        };
        assert_eq!(config.project_name("risk"), "rulesheet-risk");
    }
}
