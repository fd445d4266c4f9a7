//! File and environment configuration
//!
//! [`SdkConfig`] describes a client in YAML:
//!
//! ```yaml
//! base_url: https://api.mendeley.com
//! access_token: "..."
//! dev_token: "..."
//! count_header: Mendeley-Count
//! credential:
//!   name: Authorization
//!   prefix: "Bearer "
//! http:
//!   timeout_secs: 30
//!   user_agent: my-app/1.0
//! ```
//!
//! Environment variables override file values; see [`SdkConfig::apply_env`].

use crate::auth::CredentialHeader;
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::pagination::DEFAULT_COUNT_HEADER;
use crate::sdk::SdkOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable overriding `access_token`
pub const ENV_ACCESS_TOKEN: &str = "MENDELEY_ACCESS_TOKEN";
/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "MENDELEY_BASE_URL";
/// Environment variable overriding `dev_token`
pub const ENV_DEV_TOKEN: &str = "MENDELEY_DEV_TOKEN";

// ============================================================================
// SDK Config
// ============================================================================

/// Serializable client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SdkConfig {
    /// API base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Static access token
    #[serde(default)]
    pub access_token: Option<String>,

    /// Developer token sent with every request
    #[serde(default)]
    pub dev_token: Option<String>,

    /// Response header holding the total item count
    #[serde(default = "default_count_header")]
    pub count_header: String,

    /// Credential header name and prefix
    #[serde(default)]
    pub credential: CredentialHeader,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            access_token: None,
            dev_token: None,
            count_header: default_count_header(),
            credential: CredentialHeader::default(),
            http: HttpConfig::default(),
        }
    }
}

fn default_count_header() -> String {
    DEFAULT_COUNT_HEADER.to_string()
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl SdkConfig {
    /// Parse a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: SdkConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Override values from `MENDELEY_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override values from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = lookup(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = Some(url);
        }
        if let Some(token) = lookup(ENV_DEV_TOKEN) {
            self.dev_token = Some(token);
        }
        self.validate()
    }

    /// Check field values
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base_url {
            let url = Url::parse(base_url).map_err(|e| Error::InvalidConfigValue {
                field: "base_url".to_string(),
                message: e.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::InvalidConfigValue {
                    field: "base_url".to_string(),
                    message: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
        }

        if self.count_header.trim().is_empty() {
            return Err(Error::InvalidConfigValue {
                field: "count_header".to_string(),
                message: "header name cannot be empty".to_string(),
            });
        }

        if self.http.timeout_secs == 0 {
            return Err(Error::InvalidConfigValue {
                field: "http.timeout_secs".to_string(),
                message: "timeout must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// HTTP client settings as a transport config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder =
            HttpClientConfig::builder().timeout(Duration::from_secs(self.http.timeout_secs));
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        for (key, value) in &self.http.headers {
            builder = builder.header(key.clone(), value.clone());
        }
        builder.build()
    }

    /// Convert into SDK options with a static-token auth flow
    ///
    /// Fails when no access token is configured.
    pub fn into_options(self) -> Result<SdkOptions> {
        let http = self.http_client_config();
        let token = self
            .access_token
            .ok_or_else(|| Error::missing_field("access_token"))?;

        let mut builder = SdkOptions::builder()
            .access_token(token)
            .credential_header(self.credential)
            .count_header(self.count_header)
            .http(http);
        if let Some(base_url) = self.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(dev_token) = self.dev_token {
            builder = builder.dev_token(dev_token);
        }
        Ok(builder.build())
    }
}
