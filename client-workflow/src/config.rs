use detection_api_caller::config::{DetectionApiConfig, join_url};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub const API_URL_ENV_VAR: &str = "NEXT_PUBLIC_API_URL";
pub const ENV_ENV_VAR: &str = "NEXT_PUBLIC_ENV";

const DEFAULT_API_URL: &str = "http://localhost/api";
const DEFAULT_ENV: &str = "development";
const DEVELOPMENT_ENV: &str = "development";
const PRODUCTION_ENV: &str = "production";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Config file doesn't exist in the provided path: {0}")]
    ConfigFileDoesNotExist(PathBuf),
    #[error("File exists but it could not be read to a string for parsing: {0}")]
    FileExistsButCannotBeReadToString(std::io::Error),
    #[error("Could not parse file to config; either invalid yaml or unknown fields: {0}")]
    FileFormatCouldNotBeParsed(serde_yml::Error),
}

/// Values from the optional config file. They only replace the built-in defaults;
/// env vars and command line flags still win over them.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ClientFileConfig {
    api_url: Option<String>,
    env: Option<String>,
    api_proxy: Option<String>,
    request_timeout_seconds: Option<u64>,
}

impl ClientFileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ClientFileConfig, ConfigError> {
        if !path.as_ref().exists() {
            return Err(ConfigError::ConfigFileDoesNotExist(
                path.as_ref().to_path_buf(),
            ));
        }

        let config_file_data = std::fs::read_to_string(path)
            .map_err(ConfigError::FileExistsButCannotBeReadToString)?;

        Self::from_yaml(&config_file_data)
    }

    pub fn from_yaml(data: &str) -> Result<ClientFileConfig, ConfigError> {
        serde_yml::from_str(data).map_err(ConfigError::FileFormatCouldNotBeParsed)
    }
}

/// Resolved once at startup and handed to everything that needs it
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: String,
    env: String,
    is_dev: bool,
    is_prod: bool,
    api_proxy: Option<String>,
    request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::resolve(read_env_var)
    }

    /// Same as [`Self::resolve_layered`], reading the process environment
    pub fn from_env_layered(cli_api_url: Option<&str>, file_config: &ClientFileConfig) -> Self {
        Self::resolve_layered(cli_api_url, file_config, read_env_var)
    }

    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::resolve_layered(None, &ClientFileConfig::default(), lookup)
    }

    /// Precedence, highest first: command line, env var, config file, default.
    /// Empty values count as unset.
    pub fn resolve_layered(
        cli_api_url: Option<&str>,
        file_config: &ClientFileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let api_url = non_empty(cli_api_url.map(ToOwned::to_owned))
            .or_else(|| non_empty(lookup(API_URL_ENV_VAR)))
            .or_else(|| non_empty(file_config.api_url.clone()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let env = non_empty(lookup(ENV_ENV_VAR))
            .or_else(|| non_empty(file_config.env.clone()))
            .unwrap_or_else(|| DEFAULT_ENV.to_string());

        let result = Self {
            is_dev: env == DEVELOPMENT_ENV,
            is_prod: env == PRODUCTION_ENV,
            api_url,
            env,
            api_proxy: non_empty(file_config.api_proxy.clone()),
            request_timeout: file_config
                .request_timeout_seconds
                .map(Duration::from_secs),
        };

        tracing::debug!("Resolved client config: {result:?}");

        result
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn is_dev(&self) -> bool {
        self.is_dev
    }

    pub fn is_prod(&self) -> bool {
        self.is_prod
    }

    pub fn api_proxy(&self) -> Option<&str> {
        self.api_proxy.as_deref()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Absolute url of a path the backend returned relative to the api base
    #[must_use]
    pub fn resource_url(&self, relative_path: &str) -> String {
        join_url(&self.api_url, relative_path)
    }
}

impl From<&ClientConfig> for DetectionApiConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            api_base_url: config.api_url().to_string(),
            api_proxy: config.api_proxy().map(str::to_string),
            request_timeout: config.request_timeout(),
        }
    }
}

fn read_env_var(name: &str) -> Option<String> {
    match logging::get_from_env(name) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Ignoring env var: {e}");
            None
        }
    }
}
