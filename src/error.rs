//! Error types for mailing list API calls.
//!
//! Every failure surfaces as a typed [`Error`]. Errors produced from a server
//! response keep the raw body so callers can see exactly what the provider said.

use http::{HeaderMap, StatusCode};

/// The main error type for list and member operations.
///
/// # Examples
///
/// ```no_run
/// use mailgun_lists::{Client, Config, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().config(Config::from_env()?).build()?;
///
/// match client.get_list_by_address("dev@lists.example.com").await {
///     Ok(list) => println!("{} has {} members", list.address, list.members_count),
///     Err(Error::NotFound { .. }) => println!("no such list"),
///     Err(e) => eprintln!("lookup failed: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The targeted list or member does not exist (HTTP 404).
    #[error("Not found: {raw_response}")]
    NotFound {
        /// The raw response body
        raw_response: String,
    },

    /// A create collided with an existing list or member (HTTP 409).
    #[error("Conflict: {raw_response}")]
    Conflict {
        /// The raw response body
        raw_response: String,
    },

    /// The input was malformed.
    ///
    /// Raised either before any request is sent (invalid address, zero page
    /// size, oversized batch) or by the server with a 400 or 422 status.
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input, or the server's response body
        message: String,
        /// The HTTP status code when the server rejected the input
        status: Option<StatusCode>,
    },

    /// The server returned any other non-2xx status.
    #[error("Request failed with status {status}: {raw_response}")]
    RequestFailed {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// The transport failed before a response was received.
    ///
    /// Connection failures, timeouts and cancellations are passed through
    /// untouched as the source error. Custom transports build this variant
    /// with [`Error::transport`]. Use [`Error::is_timeout`] to spot timeouts.
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Failed to deserialize a successful response body.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Failed to serialize part of a request, such as member vars.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An invalid URL was provided or returned by the server.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Builds a client-side validation error.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
            status: None,
        }
    }

    /// Wraps a failure to reach the server.
    ///
    /// # Examples
    ///
    /// ```
    /// use mailgun_lists::Error;
    /// use std::io;
    ///
    /// let err = Error::transport(io::Error::new(io::ErrorKind::TimedOut, "no answer"));
    /// assert!(err.is_timeout());
    /// ```
    pub fn transport(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Transport(source.into())
    }

    /// Maps a non-2xx response onto the error taxonomy.
    ///
    /// # Examples
    ///
    /// ```
    /// use mailgun_lists::Error;
    /// use http::{HeaderMap, StatusCode};
    ///
    /// let err = Error::from_status(StatusCode::NOT_FOUND, "gone".to_string(), HeaderMap::new());
    /// assert!(err.is_not_found());
    ///
    /// let err = Error::from_status(StatusCode::BAD_GATEWAY, "oops".to_string(), HeaderMap::new());
    /// assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    /// ```
    pub fn from_status(status: StatusCode, raw_response: String, headers: HeaderMap) -> Self {
        match status.as_u16() {
            404 => Error::NotFound { raw_response },
            409 => Error::Conflict { raw_response },
            400 | 422 => Error::Validation {
                message: raw_response,
                status: Some(status),
            },
            _ => Error::RequestFailed {
                status,
                raw_response,
                headers,
            },
        }
    }

    /// Returns `true` for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Returns `true` for [`Error::Conflict`].
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Returns `true` if the transport gave up waiting for the server.
    pub fn is_timeout(&self) -> bool {
        let Error::Transport(source) = self else {
            return false;
        };
        if let Some(e) = source.downcast_ref::<reqwest::Error>() {
            return e.is_timeout();
        }
        source
            .downcast_ref::<std::io::Error>()
            .is_some_and(|e| e.kind() == std::io::ErrorKind::TimedOut)
    }

    /// Returns the HTTP status code if this error came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Error::Conflict { .. } => Some(StatusCode::CONFLICT),
            Error::Validation { status, .. } => *status,
            Error::RequestFailed { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::Transport(source) => source
                .downcast_ref::<reqwest::Error>()
                .and_then(reqwest::Error::status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::NotFound { raw_response } => Some(raw_response),
            Error::Conflict { raw_response } => Some(raw_response),
            Error::Validation {
                message,
                status: Some(_),
            } => Some(message),
            Error::RequestFailed { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(Box::new(e))
    }
}

/// A specialized `Result` type for mailing list operations.
pub type Result<T> = std::result::Result<T, Error>;
