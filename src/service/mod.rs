//! Phone verification service.

pub(crate) mod config;
pub(crate) mod structure;

pub use config::{VerificationConfig, VerificationConfigBuilder, VerificationConfigError};
pub use structure::{VerificationService, VerificationStarted};
