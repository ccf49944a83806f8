//! Configuration loading and management.
//!
//! Loads the embedded config.toml defaults, overlays an optional settings file,
//! then applies environment variable overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::secret::ApiToken;

/// Embedded configuration file content.
const CONFIG_TOML: &str = include_str!("../config.toml");

/// Settings file looked up in the working directory.
const LOCAL_SETTINGS_FILE: &str = "okta-inventory.toml";

/// Largest page size the apps listing endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 200;

const PLACEHOLDER_DOMAIN: &str = "YOUR_OKTA_DOMAIN";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub okta: OktaConfig,
    pub api: ApiConfig,
    pub throttle: ThrottleConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    /// Settings file overlaid on the defaults, if one was found.
    #[serde(skip)]
    pub settings_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OktaConfig {
    pub domain: String,
    #[serde(default)]
    pub api_token: ApiToken,
    pub token_scheme: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub page_size: u32,
    pub request_timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    pub request_delay_ms: u64,
    pub rate_limit_backoff_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration from embedded defaults, settings file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut merged = parse_table(CONFIG_TOML, "embedded config.toml")?;

        let settings_path = settings_file_path();
        if let Some(path) = &settings_path {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            let overlay = parse_table(&content, &path.display().to_string())?;
            merge_tables(&mut merged, overlay);
        }

        let mut config = toml::Value::Table(merged)
            .try_into::<Config>()
            .map_err(|e: toml::de::Error| ConfigError::Parse {
                source_name: "merged settings".to_string(),
                message: e.message().to_string(),
            })?;

        config.settings_path = settings_path;
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse a complete configuration from TOML text, without files or env.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut merged = parse_table(CONFIG_TOML, "embedded config.toml")?;
        merge_tables(&mut merged, parse_table(content, "inline settings")?);
        toml::Value::Table(merged)
            .try_into::<Config>()
            .map_err(|e: toml::de::Error| ConfigError::Parse {
                source_name: "inline settings".to_string(),
                message: e.message().to_string(),
            })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(domain) = env::var("OKTA_DOMAIN") {
            self.okta.domain = domain;
        }

        if let Ok(token) = env::var("OKTA_API_TOKEN") {
            self.okta.api_token = ApiToken::from(token);
        }

        if let Ok(scheme) = env::var("OKTA_TOKEN_SCHEME") {
            self.okta.token_scheme = scheme;
        }

        if let Ok(dir) = env::var("OKTA_INVENTORY_OUTPUT_DIR") {
            self.output.directory = PathBuf::from(dir);
        }

        if let Ok(log_level) = env::var("RUST_LOG") {
            self.logging.level = log_level;
        }
    }

    /// Validate that required configuration is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let domain = self.okta.domain.trim();
        if domain.is_empty() || domain == PLACEHOLDER_DOMAIN {
            return Err(ConfigError::Missing("okta.domain"));
        }

        if self.okta.api_token.is_empty() {
            return Err(ConfigError::Missing("okta.api_token"));
        }

        if self.api.page_size == 0 || self.api.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid {
                key: "api.page_size",
                message: format!("must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }

        if self.okta.token_scheme.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "okta.token_scheme",
                message: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Base URL of the Okta org, e.g. `https://acme.okta.com`.
    pub fn base_url(&self) -> String {
        let domain = self.okta.domain.trim().trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.api.connect_timeout_seconds)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.throttle.request_delay_ms)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_secs(self.throttle.rate_limit_backoff_seconds)
    }
}

/// Locate the optional user settings file.
///
/// `OKTA_INVENTORY_CONFIG` wins, then `./okta-inventory.toml`, then the
/// platform config directory.
fn settings_file_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("OKTA_INVENTORY_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(LOCAL_SETTINGS_FILE);
    if local.exists() {
        return Some(local.to_path_buf());
    }

    ProjectDirs::from("com", "okta-tools", "okta-provisioning-inventory")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .filter(|path| path.exists())
}

fn parse_table(content: &str, source_name: &str) -> Result<toml::Table, ConfigError> {
    content
        .parse::<toml::Table>()
        .map_err(|e| ConfigError::Parse {
            source_name: source_name.to_string(),
            message: e.message().to_string(),
        })
}

/// Recursively merge `overlay` into `base`; overlay values win.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(overlay_child) = value {
            if let Some(toml::Value::Table(base_child)) = base.get_mut(&key) {
                merge_tables(base_child, overlay_child);
                continue;
            }
            base.insert(key, toml::Value::Table(overlay_child));
        } else {
            base.insert(key, value);
        }
    }
}
