//! Main service implementation.

use super::config::VerificationConfig;
use crate::errors::PhoneProviderError;
use crate::providers::traits::PhoneProvider;
use crate::types::{CallRecord, PhoneNumber, VerificationCode};

#[cfg(feature = "tracing")]
use tracing::{debug, info};

/// A verification call the gateway accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationStarted {
    /// The verification call.
    pub record: CallRecord,
    /// The code announced on the call.
    pub code: VerificationCode,
}

/// Phone ownership verification on top of any [`PhoneProvider`].
///
/// Verification is two independent steps: a call announcing a code, then a
/// comparison of the code the user typed back. The second step never touches
/// the network.
///
/// # Example
///
/// ```rust,ignore
/// use phone_notifiers::{VerificationService, VerificationConfig, PhoneNumber, VerificationCode};
/// use phone_notifiers::asterisk::{AsteriskClient, AsteriskConfig, AsteriskPhoneProvider};
///
/// let provider = AsteriskPhoneProvider::new(AsteriskClient::new(AsteriskConfig::from_env()?)?);
/// let service = VerificationService::new(provider, VerificationConfig::default());
///
/// let number = PhoneNumber::new("+15550001234")?;
/// service.start_verification(&number).await?;
///
/// // Later, with the code the user entered
/// let verified = service.finish_verification(&number, &VerificationCode::new("123456")).await;
/// ```
#[derive(Debug, Clone)]
pub struct VerificationService<P: PhoneProvider> {
    provider: P,
    config: VerificationConfig,
}

impl<P: PhoneProvider> VerificationService<P> {
    /// Create a new verification service with a provider and configuration.
    pub fn new(provider: P, config: VerificationConfig) -> Self {
        Self { provider, config }
    }

    /// Create a new verification service with default configuration.
    pub fn with_provider(provider: P) -> Self {
        Self::new(provider, VerificationConfig::default())
    }

    /// Get reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get reference to the service configuration.
    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Generate a code and call `number` to announce it.
    #[cfg(feature = "random")]
    pub async fn start_verification(
        &self,
        number: &PhoneNumber,
    ) -> Result<VerificationStarted, PhoneProviderError> {
        let code = VerificationCode::generate(self.config.code_length());
        self.start_verification_with_code(number, code).await
    }

    /// Call `number` to announce a caller-chosen `code`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "verification.start",
            skip_all,
            fields(number = %number, provider = P::NAME)
        )
    )]
    pub async fn start_verification_with_code(
        &self,
        number: &PhoneNumber,
        code: VerificationCode,
    ) -> Result<VerificationStarted, PhoneProviderError> {
        let record = self.provider.make_verification_call(number, &code).await?;

        #[cfg(feature = "tracing")]
        info!(call_id = ?record.call_id, "Verification call started");

        Ok(VerificationStarted { record, code })
    }

    /// Confirm the code the user entered for `number`.
    ///
    /// # Returns
    /// * `Some(number)` - the code matches the one issued to `number`
    /// * `None` - no match
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "verification.finish",
            skip_all,
            fields(number = %number, provider = P::NAME)
        )
    )]
    pub async fn finish_verification(
        &self,
        number: &PhoneNumber,
        code: &VerificationCode,
    ) -> Option<PhoneNumber> {
        let verified = self.provider.finish_verification(number, code).await;

        #[cfg(feature = "tracing")]
        debug!(verified = verified.is_some(), "Verification finished");

        verified
    }
}
