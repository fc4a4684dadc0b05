//! Provider trait definition.

use crate::errors::PhoneProviderError;
use crate::types::{CallRecord, PhoneNumber, ProviderFlags, VerificationCode};
use std::future::Future;

/// Message used by [`PhoneProvider::make_test_call`].
pub const TEST_CALL_MESSAGE: &str = "This is a test call. Your phone notifications are working.";

/// Core trait that all phone providers must implement.
///
/// This trait defines the operations needed from any call provider:
/// - Placing a tracked notification call
/// - Placing a plain, untracked call
/// - Delivering a verification code by call
/// - Confirming a verification code
///
/// Every failure is reported as one of the two [`PhoneProviderError`] kinds,
/// depending on which operation was in progress.
///
/// # Note on async methods
///
/// All async methods in this trait return `Send` futures, making them
/// compatible with multi-threaded executors.
///
/// # Example
///
/// ```rust,ignore
/// use phone_notifiers::{PhoneProvider, PhoneNumber, CallRecord, ProviderFlags};
///
/// #[derive(Clone)]
/// struct MyProvider { /* ... */ }
///
/// impl PhoneProvider for MyProvider {
///     const NAME: &'static str = "my_provider";
///     const FLAGS: ProviderFlags = ProviderFlags { /* ... */ };
///
///     async fn make_notification_call(&self, number: &PhoneNumber, message: &str) -> Result<CallRecord, PhoneProviderError> {
///         // Dispatch the call and return the tracked record
///     }
///
///     // ...
/// }
/// ```
pub trait PhoneProvider: Send + Sync + Clone {
    /// Provider name stored on call records.
    const NAME: &'static str;

    /// Static capabilities of this provider.
    const FLAGS: ProviderFlags;

    /// Place a call reading `message` and return the tracked record.
    ///
    /// # Returns
    /// A record in [`crate::CallStatus::InProcess`] carrying the gateway's
    /// call identifier.
    fn make_notification_call(
        &self,
        number: &PhoneNumber,
        message: &str,
    ) -> impl Future<Output = Result<CallRecord, PhoneProviderError>> + Send;

    /// Place a call reading `message` without tracking it.
    fn make_call(
        &self,
        number: &PhoneNumber,
        message: &str,
    ) -> impl Future<Output = Result<(), PhoneProviderError>> + Send;

    /// Place a call announcing `code`.
    fn make_verification_call(
        &self,
        number: &PhoneNumber,
        code: &VerificationCode,
    ) -> impl Future<Output = Result<CallRecord, PhoneProviderError>> + Send;

    /// Confirm that `code` is the code last issued to `number`.
    ///
    /// # Returns
    /// * `Some(number)` - the code matches
    /// * `None` - no code cached for the number, or a different one
    fn finish_verification(
        &self,
        number: &PhoneNumber,
        code: &VerificationCode,
    ) -> impl Future<Output = Option<PhoneNumber>> + Send;

    /// Get the provider's capabilities.
    fn flags(&self) -> ProviderFlags {
        Self::FLAGS
    }

    /// Place a plain call with a fixed test message.
    fn make_test_call(
        &self,
        number: &PhoneNumber,
    ) -> impl Future<Output = Result<(), PhoneProviderError>> + Send {
        self.make_call(number, TEST_CALL_MESSAGE)
    }
}
