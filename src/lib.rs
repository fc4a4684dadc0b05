//! # Phone Notifiers
//!
//! Outbound notification and verification phone calls behind a provider
//! abstraction.
//!
//! A provider places calls reading a message to the callee, delivers
//! verification codes by call and later confirms the code the user typed
//! back. Every failure crosses the provider boundary as one of two error
//! kinds, each with a message that is safe to show to users.
//!
//! ## Supported Providers
//!
//! | Provider | Feature | Gateway |
//! |----------|---------|---------|
//! | Asterisk | `asterisk` (default) | Asterisk REST Interface (ARI) |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use phone_notifiers::{
//!     PhoneNumber, PhoneProvider, VerificationCode, VerificationService,
//!     asterisk::{AsteriskClient, AsteriskConfig, AsteriskPhoneProvider},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Settings from ASTERISK_ARI_* environment variables
//!     let client = AsteriskClient::new(AsteriskConfig::from_env()?)?;
//!     let provider = AsteriskPhoneProvider::new(client);
//!
//!     // Notify someone
//!     let number = PhoneNumber::new("+15550001234")?;
//!     let record = provider.make_notification_call(&number, "Disk is full on db-1").await?;
//!     println!("Call {:?} is {}", record.call_id, record.status);
//!
//!     // Verify ownership of a number
//!     let service = VerificationService::with_provider(provider);
//!     service.start_verification(&number).await?;
//!     let verified = service
//!         .finish_verification(&number, &VerificationCode::new("123456"))
//!         .await;
//!     println!("Verified: {}", verified.is_some());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! VerificationService<P>
//!         │
//!         ▼
//!   PhoneProvider        (trait: AsteriskPhoneProvider, etc.)
//!         │       ╲
//!         ▼        ▼
//!   AsteriskClient   VerificationCodeCache
//! ```
//!
//! ## Features
//!
//! - `asterisk` - Asterisk ARI provider support (enabled by default)
//! - `tracing` - OpenTelemetry tracing instrumentation (enabled by default)
//! - `random` - Verification code generation (enabled by default)

pub mod cache;
pub mod errors;
pub mod providers;
pub mod service;
pub mod types;

#[cfg(feature = "asterisk")]
pub use providers::asterisk;

// Re-export commonly used types at the crate root
pub use cache::{InMemoryCodeCache, VerificationCodeCache};
pub use errors::{CallFailure, FailureReason, PhoneProviderError};
pub use providers::PhoneProvider;
pub use service::{
    VerificationConfig, VerificationConfigError, VerificationService, VerificationStarted,
};
pub use types::{
    CallId, CallRecord, CallStatus, PhoneNumber, PhoneNumberError, ProviderFlags,
    VerificationCode,
};
