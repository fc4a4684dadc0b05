//! Asterisk phone provider implementation.

use super::client::AsteriskClient;
use super::response::{CallOutcome, generic_message};
use super::types::verification_message;
use crate::cache::{InMemoryCodeCache, VerificationCodeCache, verification_cache_key};
use crate::errors::{CallFailure, FailureReason, PhoneProviderError};
use crate::providers::traits::PhoneProvider;
use crate::types::{CallRecord, PhoneNumber, ProviderFlags, VerificationCode};

#[cfg(feature = "tracing")]
use opentelemetry::trace::Status;
#[cfg(feature = "tracing")]
use tracing::{Span, debug, error, info};
#[cfg(feature = "tracing")]
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Prefix of verification cache keys written and read by this provider.
pub const CACHE_KEY_PREFIX: &str = "asterisk_provider_";

/// Asterisk phone provider implementation.
///
/// This wraps the [`AsteriskClient`] and implements the generic
/// [`PhoneProvider`] trait. Issued verification codes are kept in a
/// [`VerificationCodeCache`]; by default an in-memory one.
///
/// # Example
///
/// ```rust,ignore
/// use phone_notifiers::asterisk::{AsteriskClient, AsteriskConfig, AsteriskPhoneProvider};
/// use phone_notifiers::{PhoneNumber, PhoneProvider};
///
/// let client = AsteriskClient::new(AsteriskConfig::from_env()?)?;
/// let provider = AsteriskPhoneProvider::new(client);
///
/// let number = PhoneNumber::new("+15550001234")?;
/// let record = provider.make_notification_call(&number, "Disk is full on db-1").await?;
/// println!("Call {} is {}", record.call_id.unwrap(), record.status);
/// ```
#[derive(Debug, Clone)]
pub struct AsteriskPhoneProvider<C = InMemoryCodeCache> {
    client: AsteriskClient,
    cache: C,
}

impl AsteriskPhoneProvider {
    /// Create a new Asterisk provider with an in-memory code cache.
    pub fn new(client: AsteriskClient) -> Self {
        Self::with_cache(client, InMemoryCodeCache::new())
    }
}

impl<C: VerificationCodeCache> AsteriskPhoneProvider<C> {
    /// Create a new Asterisk provider backed by the given code cache.
    pub fn with_cache(client: AsteriskClient, cache: C) -> Self {
        Self { client, cache }
    }

    /// Get reference to the inner client.
    pub fn client(&self) -> &AsteriskClient {
        &self.client
    }

    /// Get reference to the code cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Cache key of the code issued to `number`.
    pub fn cache_key(&self, number: &PhoneNumber) -> String {
        verification_cache_key(CACHE_KEY_PREFIX, number)
    }

    /// Send the call and interpret the gateway's answer.
    async fn dispatch(&self, number: &PhoneNumber, message: &str) -> CallOutcome {
        match self.client.connect(number, message, None).await {
            Ok(response) => response.into_outcome(number),
            Err(err) => {
                #[cfg(feature = "tracing")]
                error!(error = %err, number = %number, "ARI request failed");
                let _ = err;

                CallOutcome::Rejected(CallFailure::new(
                    FailureReason::Transport,
                    generic_message(number),
                ))
            }
        }
    }

    fn pending_record(&self, number: &PhoneNumber, message: &str) -> CallRecord {
        CallRecord::pending(
            <Self as PhoneProvider>::NAME,
            number.clone(),
            message,
            self.client.config().caller_id.clone(),
        )
    }
}

#[cfg(feature = "tracing")]
fn record_rejection(operation: &str, failure: &CallFailure) {
    error!(
        reason = %failure.reason,
        graceful_msg = %failure.graceful_msg,
        "AsteriskPhoneProvider::{}: failed",
        operation
    );
    Span::current().set_status(Status::error(failure.reason.to_string()));
}

#[cfg(feature = "tracing")]
fn record_acceptance(operation: &str, call_id: &crate::types::CallId) {
    info!(call_id = %call_id, "AsteriskPhoneProvider::{}: success", operation);
    Span::current()
        .record("call_id", call_id.as_ref())
        .set_status(Status::Ok);
}

impl<C: VerificationCodeCache> PhoneProvider for AsteriskPhoneProvider<C> {
    const NAME: &'static str = "asterisk";

    const FLAGS: ProviderFlags = ProviderFlags {
        configured: true,
        test_sms: false,
        test_call: true,
        verification_call: true,
        verification_sms: false,
    };

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "AsteriskPhoneProvider::make_notification_call",
            skip_all,
            fields(number = %number, call_id = tracing::field::Empty)
        )
    )]
    async fn make_notification_call(
        &self,
        number: &PhoneNumber,
        message: &str,
    ) -> Result<CallRecord, PhoneProviderError> {
        let record = self.pending_record(number, message);

        match self.dispatch(number, message).await {
            CallOutcome::Accepted(call_id) => {
                #[cfg(feature = "tracing")]
                record_acceptance("make_notification_call", &call_id);

                Ok(record.accepted(call_id))
            }
            CallOutcome::Rejected(failure) => {
                #[cfg(feature = "tracing")]
                record_rejection("make_notification_call", &failure);

                Err(PhoneProviderError::make_call(failure))
            }
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "AsteriskPhoneProvider::make_call",
            skip_all,
            fields(number = %number, call_id = tracing::field::Empty)
        )
    )]
    async fn make_call(&self, number: &PhoneNumber, message: &str) -> Result<(), PhoneProviderError> {
        match self.dispatch(number, message).await {
            CallOutcome::Accepted(call_id) => {
                #[cfg(feature = "tracing")]
                record_acceptance("make_call", &call_id);
                let _ = call_id;

                Ok(())
            }
            CallOutcome::Rejected(failure) => {
                #[cfg(feature = "tracing")]
                record_rejection("make_call", &failure);

                Err(PhoneProviderError::make_call(failure))
            }
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "AsteriskPhoneProvider::make_verification_call",
            skip_all,
            fields(number = %number, call_id = tracing::field::Empty)
        )
    )]
    async fn make_verification_call(
        &self,
        number: &PhoneNumber,
        code: &VerificationCode,
    ) -> Result<CallRecord, PhoneProviderError> {
        let message = verification_message(code);
        let record = self.pending_record(number, &message);

        match self.dispatch(number, &message).await {
            CallOutcome::Accepted(call_id) => {
                self.cache.set(&self.cache_key(number), code.clone()).await;

                #[cfg(feature = "tracing")]
                record_acceptance("make_verification_call", &call_id);

                Ok(record.accepted(call_id))
            }
            CallOutcome::Rejected(failure) => {
                #[cfg(feature = "tracing")]
                record_rejection("make_verification_call", &failure);

                Err(PhoneProviderError::start_verification(failure))
            }
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "AsteriskPhoneProvider::finish_verification",
            skip_all,
            fields(number = %number)
        )
    )]
    async fn finish_verification(
        &self,
        number: &PhoneNumber,
        code: &VerificationCode,
    ) -> Option<PhoneNumber> {
        if code.is_empty() {
            return None;
        }

        match self.cache.get(&self.cache_key(number)).await {
            Some(cached) if !cached.is_empty() && cached == *code => Some(number.clone()),
            cached => {
                #[cfg(feature = "tracing")]
                debug!(
                    cached = cached.is_some(),
                    "Verification code did not match"
                );
                let _ = cached;

                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::asterisk::AsteriskConfig;
    use crate::types::{CallId, CallStatus};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_provider(endpoint: &str) -> AsteriskPhoneProvider {
        let config = AsteriskConfig::builder(endpoint, "test_key")
            .caller_id("+15559990000")
            .trunk_name("trunk")
            .extension("100")
            .context("alerts")
            .build()
            .unwrap();
        AsteriskPhoneProvider::new(AsteriskClient::new(config).unwrap())
    }

    fn number() -> PhoneNumber {
        PhoneNumber::new("+15550001234").unwrap()
    }

    async fn mount_response(mock_server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/channels"))
            .respond_with(response)
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_make_notification_call_success() {
        let mock_server = MockServer::start().await;
        mount_response(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"call_id": "abc123"})),
        )
        .await;

        let provider = create_test_provider(&mock_server.uri());
        let record = provider
            .make_notification_call(&number(), "Test")
            .await
            .unwrap();

        assert_eq!(record.status, CallStatus::InProcess);
        assert_eq!(record.call_id, Some(CallId::from("abc123")));
        assert_eq!(record.caller_id, "+15559990000");
        assert_eq!(record.provider, "asterisk");
        assert_eq!(record.message, "Test");
        assert_eq!(record.number, number());
    }

    #[tokio::test]
    async fn test_make_notification_call_http_error() {
        let mock_server = MockServer::start().await;
        mount_response(
            &mock_server,
            ResponseTemplate::new(503)
                .set_body_string(r#"{"status":"error","data":"trunk unavailable"}"#),
        )
        .await;

        let provider = create_test_provider(&mock_server.uri());
        let err = provider
            .make_notification_call(&number(), "Test")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PhoneProviderError::FailedToMakeCall {
                graceful_msg: "Failed make call to +15550001234 with error: trunk unavailable"
                    .to_string(),
                reason: FailureReason::HttpStatus(503),
            }
        );
    }

    #[tokio::test]
    async fn test_make_notification_call_empty_body() {
        let mock_server = MockServer::start().await;
        mount_response(&mock_server, ResponseTemplate::new(200)).await;

        let provider = create_test_provider(&mock_server.uri());
        let err = provider
            .make_notification_call(&number(), "Test")
            .await
            .unwrap_err();

        assert!(matches!(err, PhoneProviderError::FailedToMakeCall { .. }));
        assert_eq!(err.reason(), FailureReason::EmptyBody);
    }

    #[tokio::test]
    async fn test_make_notification_call_missing_call_id() {
        let mock_server = MockServer::start().await;
        mount_response(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})),
        )
        .await;

        let provider = create_test_provider(&mock_server.uri());
        let err = provider
            .make_notification_call(&number(), "Test")
            .await
            .unwrap_err();

        assert!(matches!(err, PhoneProviderError::FailedToMakeCall { .. }));
        assert_eq!(err.reason(), FailureReason::MissingCallId);
        assert_eq!(err.graceful_msg(), "Failed make call to +15550001234");
    }

    #[tokio::test]
    async fn test_transport_error_hides_details() {
        let provider = create_test_provider("http://127.0.0.1:9");
        let err = provider.make_call(&number(), "Test").await.unwrap_err();

        assert_eq!(
            err,
            PhoneProviderError::FailedToMakeCall {
                graceful_msg: "Failed make call to +15550001234".to_string(),
                reason: FailureReason::Transport,
            }
        );
    }

    #[tokio::test]
    async fn test_make_call_success() {
        let mock_server = MockServer::start().await;
        mount_response(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"call_id": "c-1"})),
        )
        .await;

        let provider = create_test_provider(&mock_server.uri());
        assert!(provider.make_call(&number(), "Test").await.is_ok());
    }

    #[tokio::test]
    async fn test_make_test_call_uses_fixed_message() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/channels"))
            .and(wiremock::matchers::body_json(serde_json::json!({
                "variables": {"alertMessage": crate::providers::traits::TEST_CALL_MESSAGE}
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"call_id": "t-1"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server.uri());
        provider.make_test_call(&number()).await.unwrap();
    }

    #[tokio::test]
    async fn test_verification_call_then_finish() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/channels"))
            .and(query_param("endpoint", "PJSIP/+15550001234@trunk"))
            .and(wiremock::matchers::body_json(serde_json::json!({
                "variables": {"alertMessage": "Your verification code is 1 2 3 4 5 6"}
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"call_id": "v-1"})),
            )
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server.uri());
        let code = VerificationCode::new("123456");
        let record = provider
            .make_verification_call(&number(), &code)
            .await
            .unwrap();
        assert_eq!(record.status, CallStatus::InProcess);
        assert_eq!(record.call_id, Some(CallId::from("v-1")));

        assert_eq!(
            provider.finish_verification(&number(), &code).await,
            Some(number())
        );
        assert_eq!(
            provider
                .finish_verification(&number(), &VerificationCode::new("654321"))
                .await,
            None
        );
    }

    #[tokio::test]
    async fn test_verification_call_failures_use_verification_kind() {
        let mock_server = MockServer::start().await;
        mount_response(&mock_server, ResponseTemplate::new(200)).await;

        let provider = create_test_provider(&mock_server.uri());
        let code = VerificationCode::new("123456");
        let err = provider
            .make_verification_call(&number(), &code)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PhoneProviderError::FailedToStartVerification {
                graceful_msg: "Failed make call to +15550001234, empty body".to_string(),
                reason: FailureReason::EmptyBody,
            }
        );
        // Rejected calls leave nothing to confirm.
        assert_eq!(provider.finish_verification(&number(), &code).await, None);
    }

    #[tokio::test]
    async fn test_verification_transport_error_uses_verification_kind() {
        let provider = create_test_provider("http://127.0.0.1:9");
        let err = provider
            .make_verification_call(&number(), &VerificationCode::new("123456"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PhoneProviderError::FailedToStartVerification {
                graceful_msg: "Failed make call to +15550001234".to_string(),
                reason: FailureReason::Transport,
            }
        );
    }

    #[tokio::test]
    async fn test_verification_http_error_uses_verification_kind() {
        let mock_server = MockServer::start().await;
        mount_response(
            &mock_server,
            ResponseTemplate::new(503)
                .set_body_string(r#"{"status":"error","data":"trunk unavailable"}"#),
        )
        .await;

        let provider = create_test_provider(&mock_server.uri());
        let err = provider
            .make_verification_call(&number(), &VerificationCode::new("123456"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PhoneProviderError::FailedToStartVerification {
                graceful_msg: "Failed make call to +15550001234 with error: trunk unavailable"
                    .to_string(),
                reason: FailureReason::HttpStatus(503),
            }
        );
    }

    #[tokio::test]
    async fn test_verification_missing_call_id_uses_verification_kind() {
        let mock_server = MockServer::start().await;
        mount_response(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})),
        )
        .await;

        let provider = create_test_provider(&mock_server.uri());
        let code = VerificationCode::new("123456");
        let err = provider
            .make_verification_call(&number(), &code)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PhoneProviderError::FailedToStartVerification {
                graceful_msg: "Failed make call to +15550001234".to_string(),
                reason: FailureReason::MissingCallId,
            }
        );
        assert_eq!(provider.finish_verification(&number(), &code).await, None);
    }

    #[tokio::test]
    async fn test_empty_code_never_verifies() {
        let mock_server = MockServer::start().await;
        mount_response(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"call_id": "v-0"})),
        )
        .await;

        let provider = create_test_provider(&mock_server.uri());
        let empty = VerificationCode::new("");
        provider
            .make_verification_call(&number(), &empty)
            .await
            .unwrap();

        assert_eq!(provider.finish_verification(&number(), &empty).await, None);
        assert_eq!(
            provider
                .finish_verification(&number(), &VerificationCode::new("  "))
                .await,
            None
        );
    }

    #[tokio::test]
    async fn test_finish_verification_reads_shared_cache() {
        let cache = InMemoryCodeCache::new();
        let config = AsteriskConfig::builder("http://pbx.local:8088/ari", "key")
            .caller_id("1")
            .trunk_name("t")
            .extension("e")
            .context("c")
            .build()
            .unwrap();
        let provider =
            AsteriskPhoneProvider::with_cache(AsteriskClient::new(config).unwrap(), cache.clone());

        cache
            .set("asterisk_provider_+15550001234", VerificationCode::new("9999"))
            .await;

        assert_eq!(
            provider
                .finish_verification(&number(), &VerificationCode::new("9999"))
                .await,
            Some(number())
        );
        assert_eq!(
            provider
                .finish_verification(
                    &PhoneNumber::new("+15550009999").unwrap(),
                    &VerificationCode::new("9999")
                )
                .await,
            None
        );
    }

    #[test]
    fn test_flags_are_static() {
        let provider = create_test_provider("http://pbx.local:8088/ari");
        let flags = provider.flags();

        assert!(flags.configured);
        assert!(flags.test_call);
        assert!(flags.verification_call);
        assert!(!flags.test_sms);
        assert!(!flags.verification_sms);
        assert_eq!(flags, AsteriskPhoneProvider::<InMemoryCodeCache>::FLAGS);
    }
}
