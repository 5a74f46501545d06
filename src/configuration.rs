//! Runtime configuration for the report.
//!
//! Values come from an optional YAML file, a dotenv file and the process
//! environment, in increasing order of precedence.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://developer.api.autodesk.com";
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;

pub const ENV_CLIENT_ID: &str = "CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";
pub const ENV_HUB_ID: &str = "HUB_ID";
pub const ENV_ACCESS_TOKEN: &str = "AUTODESK_ACCESS_TOKEN";
pub const ENV_API_BASE_URL: &str = "AUTODESK_API_BASE";
pub const ENV_TOKEN_LIFETIME: &str = "AUTODESK_TOKEN_LIFETIME";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to load configuration data, because of: {cause:?}")]
    FailedToLoadData { cause: Box<dyn std::error::Error> },
    #[error("missing value for property {name:?}")]
    MissingRequiredPropertyValue { name: String },
    #[error("invalid value {value:?} for property {name:?}")]
    InvalidPropertyValue { name: String, value: String },
}

/// Shape of the optional YAML configuration file. Every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hub_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_lifetime: Option<i64>,
}

impl ConfigurationFile {
    pub fn load_from_file(path: &Path) -> Result<ConfigurationFile, ConfigurationError> {
        let contents = fs::read_to_string(path).map_err(|cause| {
            ConfigurationError::FailedToLoadData {
                cause: Box::new(cause),
            }
        })?;
        serde_yaml::from_str(&contents).map_err(|cause| ConfigurationError::FailedToLoadData {
            cause: Box::new(cause),
        })
    }

    fn get(&self, key: &str) -> Option<String> {
        match key {
            ENV_CLIENT_ID => self.client_id.clone(),
            ENV_CLIENT_SECRET => self.client_secret.clone(),
            ENV_HUB_ID => self.hub_id.clone(),
            ENV_ACCESS_TOKEN => self.access_token.clone(),
            ENV_API_BASE_URL => self.api_base_url.clone(),
            ENV_TOKEN_LIFETIME => self.token_lifetime.map(|v| v.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    client_id: String,
    client_secret: String,
    hub_id: String,
    access_token: Option<String>,
    api_base_url: Url,
    token_lifetime: Duration,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn hub_id(&self) -> &str {
        &self.hub_id
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Base URL without a trailing slash, ready to have API paths appended.
    pub fn api_base_url(&self) -> String {
        self.api_base_url.as_str().trim_end_matches('/').to_string()
    }

    /// How long a pre-supplied access token is trusted before it is refreshed.
    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// Resolve every key through `lookup`. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Configuration, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = Configuration::builder();
        if let Some(v) = value(ENV_CLIENT_ID) {
            builder = builder.client_id(v);
        }
        if let Some(v) = value(ENV_CLIENT_SECRET) {
            builder = builder.client_secret(v);
        }
        if let Some(v) = value(ENV_HUB_ID) {
            builder = builder.hub_id(v);
        }
        if let Some(v) = value(ENV_ACCESS_TOKEN) {
            builder = builder.access_token(v);
        }
        if let Some(v) = value(ENV_API_BASE_URL) {
            let url = Url::parse(v.trim()).map_err(|_| ConfigurationError::InvalidPropertyValue {
                name: ENV_API_BASE_URL.to_string(),
                value: v.clone(),
            })?;
            builder = builder.api_base_url(url);
        }
        if let Some(v) = value(ENV_TOKEN_LIFETIME) {
            let seconds = v
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigurationError::InvalidPropertyValue {
                    name: ENV_TOKEN_LIFETIME.to_string(),
                    value: v.clone(),
                })?;
            builder = builder.token_lifetime(seconds);
        }

        builder.build()
    }

    /// Load the configuration from the YAML file (if any), the dotenv file and
    /// the process environment. The environment wins over the file.
    pub fn load(
        config_file: Option<&Path>,
        env_file: Option<&Path>,
    ) -> Result<Configuration, ConfigurationError> {
        match env_file {
            Some(path) => {
                debug!("Loading environment from {}...", path.display());
                dotenvy::from_path(path).map_err(|cause| ConfigurationError::FailedToLoadData {
                    cause: Box::new(cause),
                })?;
            }
            None => {
                if let Ok(path) = dotenvy::dotenv() {
                    debug!("Loaded environment from {}", path.display());
                }
            }
        }

        let file = match config_file {
            Some(path) => {
                debug!("Loading configuration from {}...", path.display());
                ConfigurationFile::load_from_file(path)?
            }
            None => ConfigurationFile::default(),
        };

        Configuration::from_lookup(|key| std::env::var(key).ok().or_else(|| file.get(key)))
    }
}

pub struct ConfigurationBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    hub_id: Option<String>,
    access_token: Option<String>,
    api_base_url: Option<Url>,
    token_lifetime: i64,
}

impl ConfigurationBuilder {
    fn new() -> ConfigurationBuilder {
        ConfigurationBuilder {
            client_id: None,
            client_secret: None,
            hub_id: None,
            access_token: None,
            api_base_url: None,
            token_lifetime: DEFAULT_TOKEN_LIFETIME_SECONDS,
        }
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> ConfigurationBuilder {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> ConfigurationBuilder {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn hub_id(mut self, hub_id: impl Into<String>) -> ConfigurationBuilder {
        self.hub_id = Some(hub_id.into());
        self
    }

    pub fn access_token(mut self, access_token: impl Into<String>) -> ConfigurationBuilder {
        self.access_token = Some(access_token.into());
        self
    }

    pub fn api_base_url(mut self, api_base_url: Url) -> ConfigurationBuilder {
        self.api_base_url = Some(api_base_url);
        self
    }

    pub fn token_lifetime(mut self, seconds: i64) -> ConfigurationBuilder {
        self.token_lifetime = seconds;
        self
    }

    pub fn build(self) -> Result<Configuration, ConfigurationError> {
        let missing = |name: &str| ConfigurationError::MissingRequiredPropertyValue {
            name: name.to_string(),
        };

        let token_lifetime = Duration::try_seconds(self.token_lifetime)
            .filter(|lifetime| *lifetime > Duration::zero())
            .ok_or_else(|| ConfigurationError::InvalidPropertyValue {
                name: ENV_TOKEN_LIFETIME.to_string(),
                value: self.token_lifetime.to_string(),
            })?;

        let api_base_url = match self.api_base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_API_BASE_URL).map_err(|cause| {
                ConfigurationError::FailedToLoadData {
                    cause: Box::new(cause),
                }
            })?,
        };

        Ok(Configuration {
            client_id: self.client_id.ok_or_else(|| missing(ENV_CLIENT_ID))?,
            client_secret: self.client_secret.ok_or_else(|| missing(ENV_CLIENT_SECRET))?,
            hub_id: self.hub_id.ok_or_else(|| missing(ENV_HUB_ID))?,
            access_token: self.access_token,
            api_base_url,
            token_lifetime,
        })
    }
}
