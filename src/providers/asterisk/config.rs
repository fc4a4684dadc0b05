//! Asterisk ARI configuration.

use super::errors::{AsteriskError, Result};
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Environment variable holding the ARI base URL.
pub const ENV_ENDPOINT: &str = "ASTERISK_ARI_ENDPOINT";
/// Environment variable holding the ARI API key.
pub const ENV_API_KEY: &str = "ASTERISK_ARI_APIKEY";
/// Environment variable holding the caller id.
pub const ENV_CALLER_ID: &str = "ASTERISK_ARI_CALLER_ID";
/// Environment variable holding the PJSIP trunk name.
pub const ENV_TRUNK_NAME: &str = "ASTERISK_ARI_TRUNK_NAME";
/// Environment variable holding the dialplan extension.
pub const ENV_EXTENSION: &str = "ASTERISK_ARI_EXTENSION";
/// Environment variable holding the dialplan context.
pub const ENV_CONTEXT: &str = "ASTERISK_ARI_CONTEXT";
/// Optional environment variable holding the default speaker.
pub const ENV_SPEAKER: &str = "ASTERISK_ARI_SPEAKER";

/// Settings for reaching an Asterisk gateway over ARI.
///
/// Can be built in code, deserialized from any settings source, or read from
/// the `ASTERISK_ARI_*` environment variables. Every route goes through
/// [`AsteriskConfigBuilder::build`], so a loaded config is always usable.
///
/// # Example
///
/// ```rust
/// use phone_notifiers::asterisk::AsteriskConfig;
///
/// let config = AsteriskConfig::builder("http://pbx.local:8088/ari", "secret")
///     .caller_id("+15559990000")
///     .trunk_name("provider-trunk")
///     .extension("100")
///     .context("alerts")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.dial_endpoint("+15550001234"), "PJSIP/+15550001234@provider-trunk");
/// ```
#[derive(Clone, Deserialize)]
#[serde(try_from = "RawAsteriskConfig")]
pub struct AsteriskConfig {
    /// ARI base URL; channels are created at `{endpoint}/channels`.
    pub endpoint: Url,
    /// ARI API key.
    pub api_key: SecretString,
    /// Caller id presented to the callee.
    pub caller_id: String,
    /// PJSIP trunk the call is routed through.
    pub trunk_name: String,
    /// Dialplan extension the answered channel continues in.
    pub extension: String,
    /// Dialplan context of `extension`.
    pub context: String,
    /// Speaker hint used when a call does not specify one.
    pub speaker: Option<String>,
}

impl std::fmt::Debug for AsteriskConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsteriskConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("caller_id", &self.caller_id)
            .field("trunk_name", &self.trunk_name)
            .field("extension", &self.extension)
            .field("context", &self.context)
            .field("speaker", &self.speaker)
            .finish()
    }
}

impl AsteriskConfig {
    /// Create a builder for the given endpoint and API key.
    pub fn builder(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> AsteriskConfigBuilder {
        AsteriskConfigBuilder::new(endpoint, api_key)
    }

    /// Read the configuration from `ASTERISK_ARI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary settings lookup.
    ///
    /// `lookup` receives the `ASTERISK_ARI_*` setting names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(AsteriskError::MissingSetting { name })
        };

        let mut builder = Self::builder(required(ENV_ENDPOINT)?, required(ENV_API_KEY)?)
            .caller_id(required(ENV_CALLER_ID)?)
            .trunk_name(required(ENV_TRUNK_NAME)?)
            .extension(required(ENV_EXTENSION)?)
            .context(required(ENV_CONTEXT)?);

        if let Some(speaker) = lookup(ENV_SPEAKER).filter(|v| !v.trim().is_empty()) {
            builder = builder.speaker(speaker);
        }

        builder.build()
    }

    /// PJSIP endpoint dialed for `number`.
    pub fn dial_endpoint(&self, number: &str) -> String {
        format!("PJSIP/{}@{}", number, self.trunk_name)
    }
}

/// Unvalidated shape of a deserialized [`AsteriskConfig`].
#[derive(Deserialize)]
struct RawAsteriskConfig {
    endpoint: String,
    api_key: String,
    caller_id: String,
    trunk_name: String,
    extension: String,
    context: String,
    #[serde(default)]
    speaker: Option<String>,
}

impl TryFrom<RawAsteriskConfig> for AsteriskConfig {
    type Error = AsteriskError;

    fn try_from(raw: RawAsteriskConfig) -> Result<Self> {
        let mut builder = AsteriskConfig::builder(raw.endpoint, raw.api_key)
            .caller_id(raw.caller_id)
            .trunk_name(raw.trunk_name)
            .extension(raw.extension)
            .context(raw.context);

        if let Some(speaker) = raw.speaker.filter(|v| !v.trim().is_empty()) {
            builder = builder.speaker(speaker);
        }

        builder.build()
    }
}

/// Builder for [`AsteriskConfig`].
#[derive(Debug, Clone)]
pub struct AsteriskConfigBuilder {
    endpoint: String,
    api_key: String,
    caller_id: String,
    trunk_name: String,
    extension: String,
    context: String,
    speaker: Option<String>,
}

impl AsteriskConfigBuilder {
    /// Create a new builder with the given endpoint and API key.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            caller_id: String::new(),
            trunk_name: String::new(),
            extension: String::new(),
            context: String::new(),
            speaker: None,
        }
    }

    /// Set the caller id.
    pub fn caller_id(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = caller_id.into();
        self
    }

    /// Set the PJSIP trunk name.
    pub fn trunk_name(mut self, trunk_name: impl Into<String>) -> Self {
        self.trunk_name = trunk_name.into();
        self
    }

    /// Set the dialplan extension.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the dialplan context.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Set the default speaker hint.
    pub fn speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Build the [`AsteriskConfig`].
    pub fn build(self) -> Result<AsteriskConfig> {
        let endpoint = Url::parse(&self.endpoint).map_err(|e| AsteriskError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            message: e.to_string(),
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(AsteriskError::InvalidEndpoint {
                endpoint: self.endpoint,
                message: "not a base URL".to_string(),
            });
        }

        for (name, value) in [
            (ENV_API_KEY, &self.api_key),
            (ENV_CALLER_ID, &self.caller_id),
            (ENV_TRUNK_NAME, &self.trunk_name),
            (ENV_EXTENSION, &self.extension),
            (ENV_CONTEXT, &self.context),
        ] {
            if value.trim().is_empty() {
                return Err(AsteriskError::MissingSetting { name });
            }
        }

        Ok(AsteriskConfig {
            endpoint,
            api_key: SecretString::from(self.api_key),
            caller_id: self.caller_id,
            trunk_name: self.trunk_name,
            extension: self.extension,
            context: self.context,
            speaker: self.speaker,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn settings() -> HashMap<&'static str, String> {
        HashMap::from([
            (ENV_ENDPOINT, "http://pbx.local:8088/ari".to_string()),
            (ENV_API_KEY, "user:pass".to_string()),
            (ENV_CALLER_ID, "+15559990000".to_string()),
            (ENV_TRUNK_NAME, "trunk".to_string()),
            (ENV_EXTENSION, "100".to_string()),
            (ENV_CONTEXT, "alerts".to_string()),
        ])
    }

    #[test]
    fn test_from_lookup() {
        let settings = settings();
        let config = AsteriskConfig::from_lookup(|name| settings.get(name).cloned()).unwrap();

        assert_eq!(config.endpoint.as_str(), "http://pbx.local:8088/ari");
        assert_eq!(config.api_key.expose_secret(), "user:pass");
        assert_eq!(config.caller_id, "+15559990000");
        assert_eq!(config.trunk_name, "trunk");
        assert_eq!(config.extension, "100");
        assert_eq!(config.context, "alerts");
        assert!(config.speaker.is_none());
    }

    #[test]
    fn test_from_lookup_missing_setting() {
        let mut settings = settings();
        settings.insert(ENV_TRUNK_NAME, "  ".to_string());

        let err = AsteriskConfig::from_lookup(|name| settings.get(name).cloned()).unwrap_err();
        assert!(matches!(
            err,
            AsteriskError::MissingSetting { name } if name == ENV_TRUNK_NAME
        ));
    }

    #[test]
    fn test_from_lookup_speaker() {
        let mut settings = settings();
        settings.insert(ENV_SPEAKER, "alena".to_string());

        let config = AsteriskConfig::from_lookup(|name| settings.get(name).cloned()).unwrap();
        assert_eq!(config.speaker.as_deref(), Some("alena"));
    }

    #[test]
    fn test_builder_rejects_invalid_endpoint() {
        let err = AsteriskConfig::builder("not a url", "key")
            .caller_id("1")
            .trunk_name("t")
            .extension("e")
            .context("c")
            .build()
            .unwrap_err();
        assert!(matches!(err, AsteriskError::InvalidEndpoint { .. }));

        let err = AsteriskConfig::builder("mailto:ops@example.com", "key")
            .caller_id("1")
            .trunk_name("t")
            .extension("e")
            .context("c")
            .build()
            .unwrap_err();
        assert!(matches!(err, AsteriskError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_deserialize() {
        let config: AsteriskConfig = serde_json::from_value(serde_json::json!({
            "endpoint": "http://pbx.local:8088/ari",
            "api_key": "secret",
            "caller_id": "+15559990000",
            "trunk_name": "trunk",
            "extension": "100",
            "context": "alerts"
        }))
        .unwrap();

        assert_eq!(config.api_key.expose_secret(), "secret");
        assert_eq!(config.dial_endpoint("1001"), "PJSIP/1001@trunk");
    }

    #[test]
    fn test_deserialize_validates_like_builder() {
        let err = serde_json::from_value::<AsteriskConfig>(serde_json::json!({
            "endpoint": "mailto:ops@example.com",
            "api_key": "secret",
            "caller_id": "+15559990000",
            "trunk_name": "trunk",
            "extension": "100",
            "context": "alerts"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Invalid ARI endpoint"), "{}", err);

        let err = serde_json::from_value::<AsteriskConfig>(serde_json::json!({
            "endpoint": "http://pbx.local:8088/ari",
            "api_key": "secret",
            "caller_id": "+15559990000",
            "trunk_name": "",
            "extension": "100",
            "context": "alerts"
        }))
        .unwrap_err();
        assert!(err.to_string().contains(ENV_TRUNK_NAME), "{}", err);

        let err = serde_json::from_value::<AsteriskConfig>(serde_json::json!({
            "endpoint": "http://pbx.local:8088/ari",
            "api_key": "",
            "caller_id": "",
            "trunk_name": "trunk",
            "extension": "100",
            "context": "alerts"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Missing ARI setting"), "{}", err);
    }

    #[test]
    fn test_deserialize_blank_speaker_is_none() {
        let config: AsteriskConfig = serde_json::from_value(serde_json::json!({
            "endpoint": "http://pbx.local:8088/ari",
            "api_key": "secret",
            "caller_id": "+15559990000",
            "trunk_name": "trunk",
            "extension": "100",
            "context": "alerts",
            "speaker": " "
        }))
        .unwrap();
        assert!(config.speaker.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = settings();
        let config = AsteriskConfig::from_lookup(|name| settings.get(name).cloned()).unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("user:pass"));
    }
}
