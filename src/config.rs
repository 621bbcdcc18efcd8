//! Credentials and endpoint configuration.
//!
//! A [`Config`] is built once, either explicitly or from the environment, and
//! never changes afterwards. The client and its transport only read it.

use crate::{Error, Result};
use std::env;
use std::fmt;
use url::Url;

/// Default endpoint for the US region.
pub const US_BASE_URL: &str = "https://api.mailgun.net/v3";

/// Endpoint for the EU region.
pub const EU_BASE_URL: &str = "https://api.eu.mailgun.net/v3";

/// Immutable API credentials and endpoint.
///
/// # Examples
///
/// ```
/// use mailgun_lists::Config;
///
/// let config = Config::builder()
///     .api_key("key-123")
///     .domain("mg.example.com")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.base_url().as_str(), "https://api.mailgun.net/v3");
/// ```
#[derive(Clone)]
pub struct Config {
    api_key: String,
    domain: String,
    base_url: Url,
}

impl Config {
    /// Creates a new `ConfigBuilder`.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reads the configuration from the process environment.
    ///
    /// - `MG_API_KEY` (required)
    /// - `MG_DOMAIN` (required)
    /// - `MG_URL` (optional, overrides the endpoint)
    /// - `MG_REGION` (optional, `eu` selects the EU endpoint)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when a required variable is missing or
    /// the endpoint is not a valid URL.
    pub fn from_env() -> Result<Self> {
        let mut builder = Config::builder()
            .api_key(required_var("MG_API_KEY")?)
            .domain(required_var("MG_DOMAIN")?);

        if let Ok(region) = env::var("MG_REGION") {
            builder = builder.region(&region)?;
        }
        if let Ok(url) = env::var("MG_URL") {
            builder = builder.base_url(url);
        }

        builder.build()
    }

    /// The API key used for basic authentication.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The sending domain this account is configured for.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The API endpoint, including the version prefix.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

// The key never shows up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("domain", &self.domain)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

fn required_var(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Configuration(format!(
            "{} environment variable is required",
            name
        ))),
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    api_key: Option<String>,
    domain: Option<String>,
    base_url: Option<String>,
}

impl ConfigBuilder {
    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the account domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Overrides the API endpoint, e.g. to point at a test server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Selects the endpoint for a region (`us` or `eu`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an unknown region.
    pub fn region(mut self, region: &str) -> Result<Self> {
        let url = match region.trim().to_ascii_lowercase().as_str() {
            "us" | "" => US_BASE_URL,
            "eu" => EU_BASE_URL,
            other => {
                return Err(Error::Configuration(format!("Unknown region: {}", other)));
            }
        };
        self.base_url = Some(url.to_string());
        Ok(self)
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or domain is missing, or the endpoint is
    /// not a valid absolute URL.
    pub fn build(self) -> Result<Config> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Configuration("API key is required".to_string()))?;
        let domain = self
            .domain
            .filter(|d| !d.is_empty())
            .ok_or_else(|| Error::Configuration("Domain is required".to_string()))?;

        let raw = self.base_url.unwrap_or_else(|| US_BASE_URL.to_string());
        let base_url = Url::parse(raw.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "Base URL cannot carry a path: {}",
                raw
            )));
        }

        Ok(Config {
            api_key,
            domain,
            base_url,
        })
    }
}
