//! Asterisk ARI HTTP client.

use super::config::AsteriskConfig;
use super::errors::{AsteriskError, Result};
use super::response::AriResponse;
use super::types::CreateChannelBody;
use crate::types::PhoneNumber;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use secrecy::ExposeSecret;
use url::Url;

#[cfg(feature = "tracing")]
use tracing::{Span, debug};
#[cfg(feature = "tracing")]
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Asterisk ARI HTTP client.
///
/// Originates calls by creating channels through the Asterisk REST
/// Interface. Each call is a single `POST {endpoint}/channels`; the client
/// does not retry and uses the transport's default timeouts.
///
/// # Example
///
/// ```rust,ignore
/// use phone_notifiers::asterisk::{AsteriskClient, AsteriskConfig};
/// use phone_notifiers::PhoneNumber;
///
/// let config = AsteriskConfig::from_env()?;
/// let client = AsteriskClient::new(config)?;
///
/// let number = PhoneNumber::new("+15550001234")?;
/// let response = client.connect(&number, "Disk is full on db-1", None).await?;
/// println!("Gateway answered {}", response.status);
/// ```
#[derive(Clone)]
pub struct AsteriskClient {
    http_client: ClientWithMiddleware,
    config: AsteriskConfig,
}

impl std::fmt::Debug for AsteriskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsteriskClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for configuring an [`AsteriskClient`].
pub struct AsteriskClientBuilder {
    config: AsteriskConfig,
    http_client: Option<ClientWithMiddleware>,
}

impl AsteriskClientBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AsteriskConfig) -> Self {
        Self {
            config,
            http_client: None,
        }
    }

    /// Set a custom HTTP client with middleware.
    pub fn http_client(mut self, client: ClientWithMiddleware) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the [`AsteriskClient`].
    ///
    /// Fails when the configured endpoint cannot carry a `/channels` path.
    pub fn build(self) -> Result<AsteriskClient> {
        if self.config.endpoint.cannot_be_a_base() {
            return Err(AsteriskError::InvalidEndpoint {
                endpoint: self.config.endpoint.to_string(),
                message: "not a base URL".to_string(),
            });
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let client = reqwest::Client::builder()
                    .build()
                    .map_err(AsteriskError::BuildHttpClient)?;
                ClientBuilder::new(client).build()
            }
        };

        Ok(AsteriskClient {
            http_client,
            config: self.config,
        })
    }
}

impl AsteriskClient {
    /// Create a new client with a default HTTP client.
    pub fn new(config: AsteriskConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Create a builder for configuring the client.
    pub fn builder(config: AsteriskConfig) -> AsteriskClientBuilder {
        AsteriskClientBuilder::new(config)
    }

    /// Get reference to the client configuration.
    pub fn config(&self) -> &AsteriskConfig {
        &self.config
    }

    /// Build the "create channel" URL for `number`.
    fn build_request_url(&self, number: &PhoneNumber, speaker: Option<&str>) -> Result<Url> {
        let mut url = self.config.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| AsteriskError::InvalidEndpoint {
                endpoint: self.config.endpoint.to_string(),
                message: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .push("channels");

        let mut params = vec![
            ("api_key", self.config.api_key.expose_secret().to_string()),
            ("callerId", self.config.caller_id.clone()),
            ("endpoint", self.config.dial_endpoint(number.as_str())),
            ("extension", self.config.extension.clone()),
            ("context", self.config.context.clone()),
        ];
        if let Some(speaker) = speaker.or(self.config.speaker.as_deref()) {
            params.push(("speaker", speaker.to_string()));
        }

        let encoded =
            serde_urlencoded::to_string(&params).map_err(AsteriskError::BuildRequestUrl)?;
        let query = match url.query().filter(|q| !q.is_empty()) {
            Some(existing) => format!("{}&{}", existing, encoded),
            None => encoded,
        };
        url.set_query(Some(&query));

        Ok(url)
    }

    /// Ask the gateway to originate a call to `number` reading `message`.
    ///
    /// Returns the raw response whatever its status; interpreting it is up
    /// to the caller (see [`AriResponse::into_outcome`]). Errors are
    /// transport failures only.
    ///
    /// # Arguments
    /// * `number` - Destination number
    /// * `message` - Text passed to the dialplan as `alertMessage`
    /// * `speaker` - Voice hint; falls back to the configured speaker
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "AsteriskClient::connect",
            skip_all,
            fields(number = %number, http_status = tracing::field::Empty)
        )
    )]
    pub async fn connect(
        &self,
        number: &PhoneNumber,
        message: &str,
        speaker: Option<&str>,
    ) -> Result<AriResponse> {
        let url = self.build_request_url(number, speaker)?;

        #[cfg(feature = "tracing")]
        debug!(endpoint = %self.config.dial_endpoint(number.as_str()), "Creating ARI channel");

        let response = self
            .http_client
            .post(url)
            .json(&CreateChannelBody::new(message))
            .send()
            .await
            .map_err(AsteriskError::HttpRequest)?;

        let status = response.status();

        #[cfg(feature = "tracing")]
        Span::current().record("http_status", status.as_u16());

        let body = response
            .text()
            .await
            .map_err(AsteriskError::ReadResponse)?;

        #[cfg(feature = "tracing")]
        if status.is_success() {
            Span::current().set_status(opentelemetry::trace::Status::Ok);
        }

        Ok(AriResponse::new(status, body))
    }
}
