//! Asterisk provider implementation.
//!
//! This module places calls through an Asterisk gateway using ARI (the
//! Asterisk REST Interface). A call is a single "create channel" request;
//! the message is handed to the dialplan as the `alertMessage` channel
//! variable.
//!
//! # Example
//!
//! ```rust,ignore
//! use phone_notifiers::asterisk::{AsteriskClient, AsteriskConfig, AsteriskPhoneProvider};
//! use phone_notifiers::{PhoneNumber, PhoneProvider, VerificationCode};
//!
//! let config = AsteriskConfig::builder("http://pbx.local:8088/ari", "user:pass")
//!     .caller_id("+15559990000")
//!     .trunk_name("provider-trunk")
//!     .extension("100")
//!     .context("alerts")
//!     .build()?;
//! let provider = AsteriskPhoneProvider::new(AsteriskClient::new(config)?);
//!
//! let number = PhoneNumber::new("+15550001234")?;
//! provider.make_notification_call(&number, "Disk is full on db-1").await?;
//!
//! let code = VerificationCode::new("123456");
//! provider.make_verification_call(&number, &code).await?;
//! assert!(provider.finish_verification(&number, &code).await.is_some());
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod provider;
mod response;
pub mod types;

// Re-export commonly used types
pub use client::{AsteriskClient, AsteriskClientBuilder};
pub use config::{AsteriskConfig, AsteriskConfigBuilder};
pub use errors::AsteriskError;
pub use provider::{AsteriskPhoneProvider, CACHE_KEY_PREFIX};
pub use response::{AriResponse, CallOutcome, graceful_message};
