use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::identity::RoleIdentity;

pub const DEFAULT_API_URL: &str = "https://fin-sync-1.onrender.com";
pub const DEFAULT_PRIVILEGED_ROLE: &str = "superAdmin";

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Credentials of the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Bearer token sent to the API
    pub token: Option<String>,
    pub user_id: Option<String>,
    /// Role name, compared against `privileged_role`
    pub role: Option<String>,
}

/// Connection settings handed to [`ApiClient`](crate::sync::ApiClient).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_url: String,
    pub token: Option<String>,
    /// Send the bearer token with every request, not only profit goals.
    pub bearer_all_resources: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            bearer_all_resources: false,
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Root URL of the FinSync API
    pub api_url: ConfigValue<String>,
    /// Role that may manage profit goals
    pub privileged_role: ConfigValue<String>,
    pub bearer_all_resources: ConfigValue<bool>,
    pub auth: AuthConfig,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_url: Option<String>,
    privileged_role: Option<String>,
    bearer_all_resources: Option<bool>,
    auth: Option<AuthConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`], reading environment variables through `env`.
    pub fn load_with_env(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut api_url = ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default);
        let mut privileged_role =
            ConfigValue::new(DEFAULT_PRIVILEGED_ROLE.to_string(), ConfigSource::Default);
        let mut bearer_all_resources = ConfigValue::new(false, ConfigSource::Default);
        let mut auth = AuthConfig::default();
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
            tracing::debug!("Loaded config from {}", path.display());

            config_file = Some(path.clone());

            if let Some(url) = file_config.api_url {
                api_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(role) = file_config.privileged_role {
                privileged_role = ConfigValue::new(role, ConfigSource::File);
            }
            if let Some(flag) = file_config.bearer_all_resources {
                bearer_all_resources = ConfigValue::new(flag, ConfigSource::File);
            }
            if let Some(file_auth) = file_config.auth {
                auth = file_auth;
            }
        }

        if let Some(url) = env("FINSYNC_API_URL") {
            api_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Some(token) = env("FINSYNC_TOKEN") {
            auth.token = Some(token);
        }
        if let Some(user_id) = env("FINSYNC_USER_ID") {
            auth.user_id = Some(user_id);
        }
        if let Some(role) = env("FINSYNC_ROLE") {
            auth.role = Some(role);
        }

        Ok(Self {
            api_url,
            privileged_role,
            bearer_all_resources,
            auth,
            config_file,
        })
    }

    pub fn api(&self) -> ApiConfig {
        ApiConfig {
            api_url: self.api_url.value.clone(),
            token: self.auth.token.clone(),
            bearer_all_resources: self.bearer_all_resources.value,
        }
    }

    pub fn identity(&self) -> RoleIdentity {
        RoleIdentity::new(
            self.auth.user_id.clone(),
            self.auth.role.clone(),
            self.privileged_role.value.clone(),
        )
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/finsync/
    /// - macOS: ~/Library/Application Support/finsync/
    /// - Windows: %APPDATA%/finsync/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("finsync")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {1}", .0.display())]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file '{}': {1}", .0.display())]
    ParseError(PathBuf, serde_yaml::Error),
}
