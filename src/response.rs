//! Raw responses as returned by a [`Transport`](crate::Transport).
//!
//! A [`RawResponse`] keeps the status, headers and body exactly as received.
//! Status interpretation and JSON decoding happen here so every transport
//! shares the same error mapping.

use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A response as received from the API, before interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The raw response body as a string.
    pub body: String,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl RawResponse {
    /// Creates a new `RawResponse`.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            latency: Duration::ZERO,
        }
    }

    /// Converts a non-2xx response into the matching [`Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mailgun_lists::RawResponse;
    /// use http::StatusCode;
    ///
    /// let ok = RawResponse::new(StatusCode::OK, "{}");
    /// assert!(ok.error_for_status().is_ok());
    ///
    /// let missing = RawResponse::new(StatusCode::NOT_FOUND, "{\"message\":\"List not found\"}");
    /// assert!(missing.error_for_status().unwrap_err().is_not_found());
    /// ```
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            return Ok(self);
        }

        if self.status.is_client_error() {
            tracing::error!(
                status = self.status.as_u16(),
                response = %self.body,
                "Client error (4xx)"
            );
        } else {
            tracing::warn!(
                status = self.status.as_u16(),
                response = %self.body,
                "Server error"
            );
        }

        Err(Error::from_status(self.status, self.body, self.headers))
    }

    /// Decodes a successful response body as JSON.
    ///
    /// Non-2xx statuses are mapped through [`RawResponse::error_for_status`]
    /// first.
    pub fn json<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.error_for_status()?;

        match serde_json::from_str::<T>(&response.body) {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %response.body,
                    "Failed to deserialize response"
                );

                Err(Error::DeserializationFailed {
                    raw_response: response.body,
                    serde_error: e.to_string(),
                    status: response.status,
                })
            }
        }
    }

    /// Returns a reference to a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}
