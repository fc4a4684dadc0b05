//! Core types for phone call operations.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// PhoneNumber
// =============================================================================

/// Error when parsing a phone number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneNumberError {
    /// Phone number is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// Phone number contains characters the gateway cannot dial.
    #[error("phone number '{0}' must be digits with an optional leading '+'")]
    InvalidFormat(String),
}

/// Destination phone number (e.g., "+15550001234").
///
/// Only digits with an optional leading `+` are accepted, since the number is
/// interpolated into the gateway endpoint (`PJSIP/{number}@{trunk}`).
///
/// # Example
///
/// ```rust
/// use phone_notifiers::PhoneNumber;
///
/// let number = PhoneNumber::new(" +15550001234 ").unwrap();
/// assert_eq!(number.as_str(), "+15550001234");
///
/// assert!(PhoneNumber::new("").is_err());
/// assert!(PhoneNumber::new("1001@trunk").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a new PhoneNumber, trimming surrounding whitespace.
    pub fn new(s: impl AsRef<str>) -> Result<Self, PhoneNumberError> {
        static RE_NUMBER: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^\+?[0-9]{2,20}$").expect("valid phone number regex"));

        let n = s.as_ref().trim();
        if n.is_empty() {
            return Err(PhoneNumberError::Empty);
        }
        if !RE_NUMBER.is_match(n) {
            return Err(PhoneNumberError::InvalidFormat(n.to_string()));
        }
        Ok(Self(n.to_string()))
    }

    /// Get the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(de::Error::custom)
    }
}

// =============================================================================
// CallId
// =============================================================================

/// Gateway-assigned identifier of an originated call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(String);

impl CallId {
    /// Create a new CallId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Display for CallId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CallId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CallId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CallId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// =============================================================================
// VerificationCode
// =============================================================================

/// Verification code delivered by a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Create a new VerificationCode.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generate a random numeric code with the given number of digits.
    #[cfg(feature = "random")]
    pub fn generate(length: usize) -> Self {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let code: String = (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Self(code)
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the code has no characters (or only whitespace).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The code with its characters separated by single spaces.
    ///
    /// Text-to-speech engines read "1 2 3 4" digit by digit instead of as a
    /// single number.
    pub fn spaced(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * 2);
        for (i, c) in self.0.chars().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push(c);
        }
        out
    }
}

impl Display for VerificationCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for VerificationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for VerificationCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl From<&str> for VerificationCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

// =============================================================================
// CallStatus / CallRecord
// =============================================================================

/// Status of a tracked call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    /// Created, not dispatched yet.
    Pending,
    /// Accepted by the gateway.
    InProcess,
    /// Completed successfully.
    Success,
    /// Dispatch failed.
    Failed,
}

impl Display for CallStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProcess => "in_process",
            Self::Success => "success",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// A call placed through a provider.
///
/// `call_id` is only set once the gateway accepted the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Name of the provider that placed the call.
    pub provider: String,
    /// Destination number.
    pub number: PhoneNumber,
    /// Message text handed to the gateway.
    pub message: String,
    /// Current status.
    pub status: CallStatus,
    /// Gateway-assigned call identifier.
    pub call_id: Option<CallId>,
    /// Caller id presented to the callee.
    pub caller_id: String,
}

impl CallRecord {
    /// Create a record for a call about to be dispatched.
    pub fn pending(
        provider: impl Into<String>,
        number: PhoneNumber,
        message: impl Into<String>,
        caller_id: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            number,
            message: message.into(),
            status: CallStatus::Pending,
            call_id: None,
            caller_id: caller_id.into(),
        }
    }

    /// Mark the call as accepted by the gateway.
    pub fn accepted(mut self, call_id: CallId) -> Self {
        self.status = CallStatus::InProcess;
        self.call_id = Some(call_id);
        self
    }
}

// =============================================================================
// ProviderFlags
// =============================================================================

/// Capabilities of a phone provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFlags {
    /// Provider has everything it needs to place calls.
    pub configured: bool,
    /// Provider can send a test SMS.
    pub test_sms: bool,
    /// Provider can place a test call.
    pub test_call: bool,
    /// Provider can deliver a verification code by call.
    pub verification_call: bool,
    /// Provider can deliver a verification code by SMS.
    pub verification_sms: bool,
}
