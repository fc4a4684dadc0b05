//! Phone provider implementations.

pub(crate) mod traits;

#[cfg(feature = "asterisk")]
pub mod asterisk;

pub use traits::{PhoneProvider, TEST_CALL_MESSAGE};
