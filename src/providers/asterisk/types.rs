//! Types for Asterisk ARI requests.

use crate::types::VerificationCode;
use serde::Serialize;

/// JSON body of an ARI "create channel" request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateChannelBody<'a> {
    /// Channel variables available to the dialplan.
    pub variables: ChannelVariables<'a>,
}

/// Channel variables set on the originated call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelVariables<'a> {
    /// Text the dialplan reads to the callee.
    pub alert_message: &'a str,
}

impl<'a> CreateChannelBody<'a> {
    /// Create a body carrying `message` as the alert message.
    pub fn new(message: &'a str) -> Self {
        Self {
            variables: ChannelVariables {
                alert_message: message,
            },
        }
    }
}

/// Announcement read on a verification call.
pub fn verification_message(code: &VerificationCode) -> String {
    format!("Your verification code is {}", code.spaced())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_shape() {
        let body = serde_json::to_value(CreateChannelBody::new("Server is down")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"variables": {"alertMessage": "Server is down"}})
        );
    }

    #[test]
    fn test_verification_message() {
        assert_eq!(
            verification_message(&VerificationCode::new("4821")),
            "Your verification code is 4 8 2 1"
        );
    }
}
