//! Messaging gateway capability and its error type.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gateway errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The provider answered with an error. `message` and `code` come from the
    /// provider's structured error body when it sent one.
    #[error("Provider rejected request (HTTP {status}): {message}")]
    Provider {
        status: u16,
        message: String,
        code: Option<i64>,
        trace_id: Option<String>,
    },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Unexpected provider response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Provider error code, if the provider returned one.
    pub fn provider_code(&self) -> Option<i64> {
        match self {
            GatewayError::Provider { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout(_))
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Provider acceptance of an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
    /// Provider-assigned message identifier
    pub message_id: String,
    /// Normalized recipient the message was addressed to
    pub recipient: String,
}

/// Result of a provider identity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected { phone_number: String },
    Disconnected { error: String },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected { .. })
    }
}

/// Outbound messaging capability.
///
/// Implementations are stateless per call; recipients are raw phone numbers
/// and are normalized by the implementation.
pub trait MessagingGateway {
    fn send_text(&self, to: &str, body: &str) -> GatewayResult<MessageReceipt>;

    fn send_template(
        &self,
        to: &str,
        template_name: &str,
        parameters: &[String],
    ) -> GatewayResult<MessageReceipt>;

    /// Never fails; problems are reported as `Disconnected`.
    fn check_connection(&self) -> ConnectionStatus;
}

impl<G: MessagingGateway + ?Sized> MessagingGateway for Box<G> {
    fn send_text(&self, to: &str, body: &str) -> GatewayResult<MessageReceipt> {
        (**self).send_text(to, body)
    }

    fn send_template(
        &self,
        to: &str,
        template_name: &str,
        parameters: &[String],
    ) -> GatewayResult<MessageReceipt> {
        (**self).send_template(to, template_name, parameters)
    }

    fn check_connection(&self) -> ConnectionStatus {
        (**self).check_connection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_keeps_provider_message() {
        let err = GatewayError::Provider {
            status: 400,
            message: "Template name does not exist in the translation".into(),
            code: Some(132001),
            trace_id: Some("A1b2".into()),
        };
        assert_eq!(
            err.to_string(),
            "Provider rejected request (HTTP 400): Template name does not exist in the translation"
        );
        assert_eq!(err.provider_code(), Some(132001));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_timeout_is_distinct() {
        let err = GatewayError::Timeout(Duration::from_secs(10));
        assert!(err.is_timeout());
        assert_eq!(err.provider_code(), None);
    }

    #[test]
    fn test_connection_status_serde() {
        let status = ConnectionStatus::Connected {
            phone_number: "+52 55 1234 5678".into(),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "connected");
        assert!(status.is_connected());
    }
}
