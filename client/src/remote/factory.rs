//! Backend factory for dependency injection.
//!
//! This module provides utilities for creating and configuring backend
//! instances based on runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::config::{ClientConfig, HttpSettings, BACKEND_ENV, BASE_URL_ENV};
use super::error::{ClientError, ClientResult};
use super::MarketplaceApi;

#[cfg(feature = "http-api")]
use super::clients::HttpClient;
#[cfg(feature = "local-api")]
use super::clients::LocalClient;

/// Backend type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Real marketplace backend over HTTPS
    Http,
    /// In-memory backend
    Local,
}

impl FromStr for BackendKind {
    type Err = String;

    /// Parse backend kind from string.
    ///
    /// # Arguments
    /// * `s` - String representation ("http", "remote", "local")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "remote" => Ok(Self::Http),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown backend kind: {}", s)),
        }
    }
}

impl BackendKind {
    /// Get backend kind from environment.
    ///
    /// Reads `MARKETPLACE_BACKEND`. Defaults to Http if an API base URL is
    /// present, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var(BACKEND_ENV) {
            return val.parse().unwrap_or(Self::Local);
        }
        if std::env::var(BASE_URL_ENV).is_ok() {
            Self::Http
        } else {
            Self::Local
        }
    }
}

/// Factory for creating backend instances.
///
/// # Example
/// ```ignore
/// use sewa_client::remote::{BackendKind, ClientFactory};
///
/// let local = ClientFactory::create_local();
/// let http = ClientFactory::create(BackendKind::Http, Some(&settings))?;
/// ```
pub struct ClientFactory;

impl ClientFactory {
    /// Create a backend instance based on kind.
    ///
    /// # Arguments
    /// * `kind` - Which backend to create
    /// * `http_settings` - HTTP settings (required for Http)
    ///
    /// # Returns
    /// * `Ok(Arc<dyn MarketplaceApi>)` - backend instance
    /// * `Err(ClientError)` - if creation fails
    pub fn create(
        kind: BackendKind,
        http_settings: Option<&HttpSettings>,
    ) -> ClientResult<Arc<dyn MarketplaceApi>> {
        match kind {
            BackendKind::Http => {
                #[cfg(feature = "http-api")]
                {
                    let settings = http_settings.ok_or_else(|| {
                        ClientError::configuration("HTTP backend requires HttpSettings")
                    })?;
                    let client = Self::create_http(settings)?;
                    Ok(client as Arc<dyn MarketplaceApi>)
                }
                #[cfg(not(feature = "http-api"))]
                {
                    let _ = http_settings;
                    Err(ClientError::configuration(
                        "HTTP backend feature not enabled",
                    ))
                }
            }
            BackendKind::Local => {
                #[cfg(feature = "local-api")]
                {
                    Ok(Self::create_local())
                }
                #[cfg(not(feature = "local-api"))]
                {
                    Err(ClientError::configuration(
                        "Local backend feature not enabled",
                    ))
                }
            }
        }
    }

    /// Create an HTTP backend.
    #[cfg(feature = "http-api")]
    pub fn create_http(settings: &HttpSettings) -> ClientResult<Arc<HttpClient>> {
        Ok(Arc::new(HttpClient::new(settings.clone())?))
    }

    /// Create an in-memory local backend seeded with sample data.
    #[cfg(feature = "local-api")]
    pub fn create_local() -> Arc<dyn MarketplaceApi> {
        Arc::new(LocalClient::seeded())
    }

    /// Create a backend from environment configuration.
    ///
    /// Reads `MARKETPLACE_BACKEND` to determine which backend to create.
    /// Defaults to Http when an API base URL is set, otherwise Local.
    pub fn from_env() -> ClientResult<Arc<dyn MarketplaceApi>> {
        match BackendKind::from_env() {
            BackendKind::Http => {
                #[cfg(feature = "http-api")]
                {
                    let settings = HttpSettings::from_env()?;
                    Self::create(BackendKind::Http, Some(&settings))
                }
                #[cfg(not(feature = "http-api"))]
                {
                    Err(ClientError::configuration(
                        "HTTP backend feature not enabled",
                    ))
                }
            }
            BackendKind::Local => Self::create(BackendKind::Local, None),
        }
    }

    /// Create a backend from a TOML configuration file.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> ClientResult<Arc<dyn MarketplaceApi>> {
        let config = ClientConfig::from_file(path)?;
        Self::from_client_config(&config)
    }

    fn from_client_config(config: &ClientConfig) -> ClientResult<Arc<dyn MarketplaceApi>> {
        let kind: BackendKind = config
            .backend
            .backend_type
            .parse()
            .map_err(ClientError::configuration)?;
        Self::create(kind, Some(&config.http))
    }
}

/// Builder for configuring backend creation.
///
/// # Example
/// ```ignore
/// use sewa_client::remote::{BackendKind, ClientBuilder};
///
/// let api = ClientBuilder::new()
///     .backend_kind(BackendKind::Local)
///     .build()?;
/// ```
pub struct ClientBuilder {
    kind: BackendKind,
    http_settings: Option<HttpSettings>,
}

impl ClientBuilder {
    /// Create a new builder with the environment's defaults.
    pub fn new() -> Self {
        Self {
            kind: BackendKind::from_env(),
            http_settings: None,
        }
    }

    /// Set the backend kind.
    pub fn backend_kind(mut self, kind: BackendKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the HTTP settings.
    pub fn http_settings(mut self, settings: HttpSettings) -> Self {
        self.http_settings = Some(settings);
        self
    }

    /// Load configuration from a TOML file.
    pub fn from_config_file<P: AsRef<Path>>(mut self, path: P) -> ClientResult<Self> {
        let config = ClientConfig::from_file(path)?;
        self.kind = config
            .backend
            .backend_type
            .parse()
            .map_err(ClientError::configuration)?;
        self.http_settings = Some(config.http);
        Ok(self)
    }

    /// Build the backend instance.
    pub fn build(self) -> ClientResult<Arc<dyn MarketplaceApi>> {
        ClientFactory::create(self.kind, self.http_settings.as_ref())
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
