//! Response interpretation for Asterisk ARI.

use crate::errors::{CallFailure, FailureReason};
use crate::types::{CallId, PhoneNumber};
use reqwest::StatusCode;
use serde_json::Value;

/// Raw answer of the gateway to a "create channel" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AriResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response body text.
    pub body: String,
}

/// Result of a call attempt.
///
/// Empty bodies and missing identifiers are expected gateway answers, so
/// they are variants here rather than errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Accepted(CallId),
    Rejected(CallFailure),
}

impl CallOutcome {
    /// Convert outcome into a Result for ergonomic error handling.
    pub fn into_result(self) -> Result<CallId, CallFailure> {
        match self {
            Self::Accepted(call_id) => Ok(call_id),
            Self::Rejected(failure) => Err(failure),
        }
    }
}

impl AriResponse {
    /// Create a response from status and body.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decide whether the gateway produced a usable call.
    ///
    /// A 2xx status is not enough: the body must be a non-empty JSON object
    /// with a non-empty `call_id`.
    pub fn into_outcome(self, number: &PhoneNumber) -> CallOutcome {
        if !self.status.is_success() {
            let body = serde_json::from_str::<Value>(&self.body).ok();
            return CallOutcome::Rejected(CallFailure::new(
                FailureReason::HttpStatus(self.status.as_u16()),
                graceful_message(body.as_ref(), number),
            ));
        }

        if self.body.trim().is_empty() {
            return CallOutcome::Rejected(CallFailure::new(
                FailureReason::EmptyBody,
                empty_body_message(number),
            ));
        }

        let body = match serde_json::from_str::<Value>(&self.body) {
            Ok(body) => body,
            Err(_) => {
                return CallOutcome::Rejected(CallFailure::new(
                    FailureReason::MalformedBody,
                    generic_message(number),
                ));
            }
        };

        if is_blank(&body) {
            return CallOutcome::Rejected(CallFailure::new(
                FailureReason::EmptyBody,
                empty_body_message(number),
            ));
        }
        if !body.is_object() {
            return CallOutcome::Rejected(CallFailure::new(
                FailureReason::MalformedBody,
                generic_message(number),
            ));
        }

        match body.get("call_id").filter(|id| !is_blank(id)) {
            Some(id) => CallOutcome::Accepted(CallId::new(value_text(id))),
            None => CallOutcome::Rejected(CallFailure::new(
                FailureReason::MissingCallId,
                graceful_message(Some(&body), number),
            )),
        }
    }
}

/// User-facing message for a failed call to `number`.
///
/// Uses the gateway's own description when the body reports
/// `"status": "error"` with a `data` field.
pub fn graceful_message(body: Option<&Value>, number: &PhoneNumber) -> String {
    if let Some(body) = body
        && body.get("status").and_then(Value::as_str) == Some("error")
        && let Some(data) = body.get("data").filter(|data| !is_blank(data))
    {
        return format!("Failed make call to {} with error: {}", number, value_text(data));
    }
    generic_message(number)
}

/// Message used when nothing more specific is known.
pub fn generic_message(number: &PhoneNumber) -> String {
    format!("Failed make call to {}", number)
}

/// Message used when the gateway answered 2xx with nothing in the body.
pub fn empty_body_message(number: &PhoneNumber) -> String {
    format!("Failed make call to {}, empty body", number)
}

/// JSON values that carry no information: null, false, 0, "", [] and {}.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Strings without their JSON quotes, everything else as JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
