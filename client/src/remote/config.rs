//! Backend configuration file support.
//!
//! This module provides utilities for reading client configuration from
//! TOML configuration files (`client.toml`) and the environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ClientError, ClientResult};

/// Environment variable selecting the backend ("http" or "local").
pub const BACKEND_ENV: &str = "MARKETPLACE_BACKEND";
/// Environment variable with the REST API base URL.
pub const BASE_URL_ENV: &str = "API_BASE_URL";
/// Environment variable with the geocoder base URL.
pub const GEOCODE_URL_ENV: &str = "GEOCODE_BASE_URL";
/// Environment variable with the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "API_TIMEOUT_SECS";

/// Client configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub backend: BackendSettings,
    #[serde(default)]
    pub http: HttpSettings,
}

/// Backend type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(rename = "type")]
    pub backend_type: String,
}

/// HTTP backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_geocode_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("sewa-client/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            geocode_url: default_geocode_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpSettings {
    /// Build HTTP settings from environment variables.
    ///
    /// # Returns
    /// * `Ok(HttpSettings)` if `API_BASE_URL` is set
    /// * `Err(ClientError::ConfigurationError)` otherwise
    pub fn from_env() -> ClientResult<Self> {
        let base_url = std::env::var(BASE_URL_ENV).map_err(|_| {
            ClientError::configuration(format!("{} is not set", BASE_URL_ENV))
        })?;

        let mut settings = Self {
            base_url,
            ..Self::default()
        };
        if let Ok(url) = std::env::var(GEOCODE_URL_ENV) {
            settings.geocode_url = url;
        }
        if let Ok(secs) = std::env::var(TIMEOUT_ENV) {
            settings.timeout_secs = secs.parse().map_err(|_| {
                ClientError::configuration(format!("{} must be an integer", TIMEOUT_ENV))
            })?;
        }
        Ok(settings)
    }

    /// Validate that the settings are usable.
    pub fn validate(&self) -> ClientResult<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::configuration("base_url must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::configuration(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        Ok(())
    }
}

impl ClientConfig {
    /// Load client configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ClientConfig)` if successful
    /// * `Err(ClientError::ConfigurationError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> ClientResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ClientError::configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ClientError::configuration(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    /// Load from the default configuration file locations.
    ///
    /// Searches `./client.toml`, then `$HOME/.config/sewa/client.toml`.
    pub fn from_default_location() -> ClientResult<Self> {
        for path in Self::default_locations() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Err(ClientError::configuration(
            "no client.toml found in default locations",
        ))
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from("client.toml")];
        if let Some(home) = std::env::var_os("HOME") {
            locations.push(
                PathBuf::from(home)
                    .join(".config")
                    .join("sewa")
                    .join("client.toml"),
            );
        }
        locations
    }
}
