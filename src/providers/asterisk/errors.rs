//! Error types for the Asterisk client.

use thiserror::Error;

/// Main error type for Asterisk client operations.
///
/// These errors stay inside the provider: [`super::AsteriskPhoneProvider`]
/// translates them into [`crate::PhoneProviderError`] before returning.
#[derive(Debug, Error)]
pub enum AsteriskError {
    /// Failed to build HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// Gateway endpoint is not a usable base URL.
    #[error("Invalid ARI endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    /// Error building the channel request URL.
    #[error("Error building ARI request URL: {0}")]
    BuildRequestUrl(#[source] serde_urlencoded::ser::Error),

    /// Failed to send HTTP request.
    #[error("Failed to send HTTP request: {0}")]
    HttpRequest(#[from] reqwest_middleware::Error),

    /// Failed to read the response body.
    #[error("Failed to read response: {0}")]
    ReadResponse(#[source] reqwest::Error),

    /// A required setting is absent or empty.
    #[error("Missing ARI setting {name}")]
    MissingSetting { name: &'static str },
}

pub type Result<T> = std::result::Result<T, AsteriskError>;
