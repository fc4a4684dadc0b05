//! Error types for phone call operations.

use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Why a call could not be placed.
///
/// A gateway can answer with a 2xx status and still not hand back a usable
/// call, so the reason is tracked separately from the transport outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Connection error or unreadable response.
    Transport,
    /// Gateway answered with a non-success HTTP status.
    HttpStatus(u16),
    /// 2xx response whose body is not a JSON object.
    MalformedBody,
    /// 2xx response with an empty body.
    EmptyBody,
    /// 2xx response without a call identifier.
    MissingCallId,
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport error"),
            Self::HttpStatus(code) => write!(f, "http status {}", code),
            Self::MalformedBody => write!(f, "malformed body"),
            Self::EmptyBody => write!(f, "empty body"),
            Self::MissingCallId => write!(f, "missing call id"),
        }
    }
}

/// A rejected call attempt with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFailure {
    /// What went wrong.
    pub reason: FailureReason,
    /// Message safe to show to the user.
    pub graceful_msg: String,
}

impl CallFailure {
    /// Create a new failure.
    pub fn new(reason: FailureReason, graceful_msg: impl Into<String>) -> Self {
        Self {
            reason,
            graceful_msg: graceful_msg.into(),
        }
    }
}

/// Errors surfaced by phone providers.
///
/// These are the only failures that cross a provider boundary; transport and
/// parsing errors are translated into one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneProviderError {
    /// A notification or plain call could not be placed.
    #[error("Failed to make call ({reason}): {graceful_msg}")]
    FailedToMakeCall {
        graceful_msg: String,
        reason: FailureReason,
    },

    /// A verification call could not be placed.
    #[error("Failed to start verification ({reason}): {graceful_msg}")]
    FailedToStartVerification {
        graceful_msg: String,
        reason: FailureReason,
    },
}

impl PhoneProviderError {
    /// Wrap a failure as [`PhoneProviderError::FailedToMakeCall`].
    pub fn make_call(failure: CallFailure) -> Self {
        Self::FailedToMakeCall {
            graceful_msg: failure.graceful_msg,
            reason: failure.reason,
        }
    }

    /// Wrap a failure as [`PhoneProviderError::FailedToStartVerification`].
    pub fn start_verification(failure: CallFailure) -> Self {
        Self::FailedToStartVerification {
            graceful_msg: failure.graceful_msg,
            reason: failure.reason,
        }
    }

    /// User-facing description of the failure.
    pub fn graceful_msg(&self) -> &str {
        match self {
            Self::FailedToMakeCall { graceful_msg, .. }
            | Self::FailedToStartVerification { graceful_msg, .. } => graceful_msg,
        }
    }

    /// Why the call failed.
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::FailedToMakeCall { reason, .. }
            | Self::FailedToStartVerification { reason, .. } => *reason,
        }
    }
}
