use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{DirectoryError, Result};
use crate::github::{normalize_base_url, DEFAULT_API_URL};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Where to look for the API token. The env var is tried first, then the command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub token_env: Option<String>,
    pub token_command: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_env: Some("GITHUB_TOKEN".to_string()),
            token_command: Some("gh auth token".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

fn config_dir() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("ghdir"))
}

fn default_config_path() -> Option<PathBuf> {
    Some(config_dir()?.join("config.toml"))
}

impl Config {
    /// Load `<config_dir>/ghdir/config.toml`, or `path` if given.
    /// A missing file yields the defaults; so does a broken one, with a warning.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Config::default();
        };

        match Self::parse(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Config::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| DirectoryError::Config(e.to_string()))?;
        config.api.base_url = normalize_base_url(&config.api.base_url);
        Ok(config)
    }

    /// Apply command-line overrides on top of the file settings.
    pub fn with_overrides(mut self, api_url: Option<&str>, token_env: Option<&str>) -> Self {
        if let Some(url) = api_url {
            self.api.base_url = normalize_base_url(url);
        }
        if let Some(var) = token_env {
            self.auth.token_env = Some(var.to_string());
        }
        self
    }
}
