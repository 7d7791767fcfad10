//! Configuration for the hook

use eca_gate_core::{ForkPolicy, GateSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main hook configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// GitLab API access
    #[serde(default)]
    pub gitlab: GitLabConfig,

    /// Validation service access
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Gate policy
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Hook environment
    #[serde(default)]
    pub hook: HookConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitLab API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabConfig {
    /// API base, including `/api/v4`
    #[serde(default = "default_gitlab_api_url")]
    pub api_url: String,

    /// File holding the API access token
    #[serde(default = "default_token_path")]
    pub token_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            api_url: default_gitlab_api_url(),
            token_path: default_token_path(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Validation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Endpoint receiving validation requests
    #[serde(default = "default_validation_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Ask the service for strict validation
    #[serde(default)]
    pub strict_mode: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            url: default_validation_url(),
            timeout_secs: default_timeout(),
            strict_mode: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// What to do with pushes to forks
    #[serde(default)]
    pub fork: ForkPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    /// Environment variable naming the repository
    #[serde(default = "default_repository_env")]
    pub repository_env: String,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            repository_env: default_repository_env(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_gitlab_api_url() -> String {
    "https://gitlab.eclipse.org/api/v4".to_string()
}

fn default_token_path() -> String {
    "/etc/gitlab/eca-access-token".to_string()
}

fn default_validation_url() -> String {
    "https://api.eclipse.org/git/eca".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_repository_env() -> String {
    "GL_REPOSITORY".to_string()
}

// Anything louder than warn lands in the pusher's terminal
fn default_log_level() -> String {
    "warn".to_string()
}

impl GateConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `ECA_GATE__SECTION__KEY` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&GateConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("ECA_GATE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    pub fn settings(&self) -> GateSettings {
        GateSettings {
            fork_policy: self.policy.fork,
            strict_mode: self.validation.strict_mode,
        }
    }
}

impl GitLabConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ValidationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GateConfig::default();
        assert_eq!(config.gitlab.api_url, "https://gitlab.eclipse.org/api/v4");
        assert_eq!(config.gitlab.token_path, "/etc/gitlab/eca-access-token");
        assert_eq!(config.validation.url, "https://api.eclipse.org/git/eca");
        assert_eq!(config.hook.repository_env, "GL_REPOSITORY");
        assert_eq!(config.logging.level, "warn");
        assert!(!config.validation.strict_mode);
    }

    #[test]
    fn test_default_settings() {
        let settings = GateConfig::default().settings();
        assert_eq!(settings, GateSettings::default());
    }

    #[test]
    fn test_load_file_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[validation]
url = "http://localhost:9000/git/eca"
strict_mode = true

[policy]
fork = "validate_against_upstream"
"#
        )
        .unwrap();

        let config = GateConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.validation.url, "http://localhost:9000/git/eca");
        assert!(config.validation.strict_mode);
        assert_eq!(config.policy.fork, ForkPolicy::ValidateAgainstUpstream);
        // Untouched sections keep defaults
        assert_eq!(config.gitlab.timeout_secs, 30);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = GateConfig::load(Some("/nonexistent/eca-gate")).unwrap();
        assert_eq!(config.hook.repository_env, "GL_REPOSITORY");
    }
}
