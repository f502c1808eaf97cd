//! Client for the external random-string provider.
//!
//! The provider is a plain HTTP endpoint returning the random string as the
//! response body (random.org's `format=plain` by default). The ledger treats
//! the value as opaque; this client only trims surrounding whitespace.

use std::time::Duration;

use reqwest::Client;

/// Error type for random-string fetches.
#[derive(Debug, thiserror::Error)]
pub enum RandomError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("provider returned status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// Provider answered with an empty body.
    #[error("provider returned an empty body")]
    EmptyBody,
}

/// Random-string provider client.
#[derive(Debug, Clone)]
pub struct RandomClient {
    client: Client,
    url: String,
}

impl RandomClient {
    /// Create a new client for the given provider URL.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch one random string from the provider.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, a non-success status, or an
    /// empty response body.
    pub async fn fetch(&self) -> Result<String, RandomError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RandomError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let value = body.trim();
        if value.is_empty() {
            return Err(RandomError::EmptyBody);
        }

        Ok(value.to_string())
    }
}
