//! The API client and its builder.
//!
//! [`Client`] is the entry point for every list and member operation. The
//! operations themselves live next to their data types in
//! [`lists`](crate::lists) and [`members`](crate::members); this module wires
//! configuration and transport together.

use crate::{
    metadata::{parse_header, RequestMetadata},
    transport::{HttpTransport, Transport},
    Config, Error, RawResponse, Result,
};
use http::HeaderMap;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Client for the mailing list API.
///
/// Cheap to clone; clones share the configuration and connection pool. The
/// client holds no mutable state, so it can be used from any number of tasks
/// at once.
///
/// # Examples
///
/// ```no_run
/// use mailgun_lists::{AccessLevel, Client, Config, List};
///
/// # async fn example() -> Result<(), mailgun_lists::Error> {
/// let client = Client::builder()
///     .config(Config::from_env()?)
///     .build()?;
///
/// let list = List::new("dev@mg.example.com")
///     .with_name("Developers")
///     .with_access_level(AccessLevel::Members);
/// let created = client.create_list(&list).await?;
/// println!("created at {}", created.created_at);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client with the default transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        ClientBuilder::new().config(config).build()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Sends a request and returns the raw response, whatever its status.
    pub(crate) async fn execute(&self, metadata: RequestMetadata) -> Result<RawResponse> {
        match self.inner.transport.execute(&metadata).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    method = %metadata.method,
                    path = %metadata.path,
                    "Request failed"
                );
                Err(e)
            }
        }
    }

    /// Sends a request and decodes a successful JSON body.
    pub(crate) async fn call<Res>(&self, metadata: RequestMetadata) -> Result<Res>
    where
        Res: DeserializeOwned,
    {
        self.execute(metadata).await?.json()
    }

    /// Sends a request, keeping only whether it succeeded.
    pub(crate) async fn call_discarding(&self, metadata: RequestMetadata) -> Result<()> {
        self.execute(metadata).await?.error_for_status().map(|_| ())
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use mailgun_lists::{ClientBuilder, Config};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), mailgun_lists::Error> {
/// let config = Config::builder()
///     .api_key("key-123")
///     .domain("mg.example.com")
///     .build()?;
///
/// let client = ClientBuilder::new()
///     .config(config)
///     .timeout(Duration::from_secs(30))
///     .default_header("User-Agent", "my-app/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    config: Option<Config>,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            config: None,
            default_headers: HeaderMap::new(),
            timeout: None,
            transport: None,
        }
    }

    /// Sets the credentials and endpoint.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// Ignored when a custom transport is supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the per-request timeout of the default transport.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the default `reqwest` transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration was provided or the HTTP client
    /// cannot be built.
    pub fn build(self) -> Result<Client> {
        let config = self
            .config
            .ok_or_else(|| Error::Configuration("Config is required".to_string()))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::with_options(
                config.clone(),
                self.default_headers,
                self.timeout,
            )?),
        };

        Ok(Client {
            inner: Arc::new(ClientInner { config, transport }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
