// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Client Configuration
//
// Explicit configuration handed to the CRUD store client and the inference
// client at construction:
// - CRUD API base URL (agents / tasks / missions resources)
// - Execution service base URL (POST /results)
// - Client-side execution timeout budget
//
// Loaded from YAML with discovery, then overridden from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default client-side budget for a mission run. Kept below the 60 s gateway
/// timeout in front of the execution service.
pub const DEFAULT_EXECUTION_TIMEOUT: Duration = Duration::from_secs(55);

pub const ENV_CONFIG_PATH: &str = "CREWDECK_CONFIG_PATH";
pub const ENV_CRUD_API_URL: &str = "CREWDECK_API_URL";
pub const ENV_INFERENCE_API_URL: &str = "CREWDECK_LLM_API_URL";
pub const ENV_EXECUTION_TIMEOUT: &str = "CREWDECK_EXECUTION_TIMEOUT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// CRUD API for agents, tasks and missions
    #[serde(default)]
    pub crud_api: EndpointConfig,

    /// Mission execution service
    #[serde(default)]
    pub inference_api: EndpointConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default)]
    pub base_url: String,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Base URL without trailing slash, ready for joining resource paths.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base(), path.trim_start_matches('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(with = "humantime_serde", default = "default_execution_timeout")]
    pub timeout: Duration,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_EXECUTION_TIMEOUT,
        }
    }
}

fn default_execution_timeout() -> Duration {
    DEFAULT_EXECUTION_TIMEOUT
}

impl ClientConfig {
    pub fn new(crud_api: impl Into<String>, inference_api: impl Into<String>) -> Self {
        Self {
            crud_api: EndpointConfig::new(crud_api),
            inference_api: EndpointConfig::new(inference_api),
            execution: ExecutionConfig::default(),
        }
    }

    pub fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution.timeout = timeout;
        self
    }

    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. CREWDECK_CONFIG_PATH environment variable
    /// 2. ./crewdeck.yaml (working directory)
    /// 3. ~/.crewdeck/config.yaml (user home)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./crewdeck.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".crewdeck").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            Self::from_yaml_file(config_path)?
        } else {
            tracing::debug!("No configuration file found in standard locations. Using defaults.");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary variable source.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_CRUD_API_URL) {
            tracing::info!("Environment override: {}={}", ENV_CRUD_API_URL, url);
            self.crud_api.base_url = url;
        }

        if let Some(url) = lookup(ENV_INFERENCE_API_URL) {
            tracing::info!("Environment override: {}={}", ENV_INFERENCE_API_URL, url);
            self.inference_api.base_url = url;
        }

        if let Some(val) = lookup(ENV_EXECUTION_TIMEOUT) {
            match humantime_serde::re::humantime::parse_duration(&val) {
                Ok(timeout) => {
                    tracing::info!("Environment override: {}={}", ENV_EXECUTION_TIMEOUT, val);
                    self.execution.timeout = timeout;
                }
                Err(e) => {
                    tracing::warn!(
                        "Invalid value for {}: '{}' ({}). Ignoring.",
                        ENV_EXECUTION_TIMEOUT,
                        val,
                        e
                    );
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_endpoint("crud_api.base_url", &self.crud_api)?;
        validate_endpoint("inference_api.base_url", &self.inference_api)?;

        if self.execution.timeout.is_zero() {
            anyhow::bail!("execution.timeout must be greater than zero");
        }

        Ok(())
    }
}

fn validate_endpoint(field: &str, endpoint: &EndpointConfig) -> anyhow::Result<()> {
    if endpoint.base_url.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", field);
    }
    if !(endpoint.base_url.starts_with("http://") || endpoint.base_url.starts_with("https://")) {
        anyhow::bail!("{} must be an http(s) URL, got '{}'", field, endpoint.base_url);
    }
    Ok(())
}
