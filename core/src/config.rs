use crate::errors::{GatewayError, GatewayResult};
use crate::rpc_types::{ClientInfo, InitializeParams, PROTOCOL_VERSION};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings given explicitly by the caller, e.g. command-line flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Configuration for talking to a gateway
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub client_name: String,
    pub client_version: String,
    pub protocol_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            client_name: "lowband-client".to_string(),
            client_version: "1.0.0".to_string(),
            protocol_version: PROTOCOL_VERSION.to_string(),
            log_level: None,
        }
    }
}

impl GatewayConfig {
    /// Creates a default configuration pointed at `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> GatewayResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                GatewayError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                GatewayError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> GatewayResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            GatewayError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        // Ensure the directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GatewayError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            GatewayError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Overrides fields from `LOWBAND_*` environment variables
    pub fn apply_env(mut self) -> GatewayResult<Self> {
        if let Ok(base_url) = env::var("LOWBAND_BASE_URL") {
            self.base_url = base_url;
        }
        if let Ok(timeout) = env::var("LOWBAND_TIMEOUT_SECS") {
            self.timeout_secs = timeout.trim().parse().map_err(|_| {
                GatewayError::ConfigError(format!(
                    "LOWBAND_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    timeout
                ))
            })?;
        }
        if let Ok(level) = env::var("LOWBAND_LOG_LEVEL") {
            self.log_level = Some(level);
        }
        Ok(self)
    }

    /// Merges explicit overrides over this config. Any field that is set wins,
    /// even when it equals the default.
    pub fn merge(&self, overrides: &ConfigOverrides) -> Self {
        Self {
            base_url: overrides
                .base_url
                .clone()
                .unwrap_or_else(|| self.base_url.clone()),
            timeout_secs: overrides.timeout_secs.unwrap_or(self.timeout_secs),
            log_level: overrides
                .log_level
                .clone()
                .or_else(|| self.log_level.clone()),
            ..self.clone()
        }
    }

    /// Checks the settings the client cannot work without and normalizes the base URL
    pub fn validate(mut self) -> GatewayResult<Self> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            return Err(GatewayError::ConfigError(
                "base URL cannot be empty".to_string(),
            ));
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(GatewayError::ConfigError(format!(
                "base URL must start with http:// or https://, got {}",
                trimmed
            )));
        }
        if self.timeout_secs == 0 {
            return Err(GatewayError::ConfigError(
                "timeout must be at least one second".to_string(),
            ));
        }
        self.base_url = trimmed;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parameters sent with every `initialize` handshake
    pub fn initialize_params(&self) -> InitializeParams {
        InitializeParams::new(
            self.protocol_version.clone(),
            ClientInfo {
                name: self.client_name.clone(),
                version: self.client_version.clone(),
            },
        )
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> GatewayResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        GatewayError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> GatewayResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
