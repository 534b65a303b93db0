//! HTTP client for the messaging provider.

use crate::config::GatewayConfig;
use crate::gateway::{ConnectionStatus, GatewayError, GatewayResult, MessageReceipt, MessagingGateway};
use crate::payload::{OutboundMessage, PhoneNumberInfo, ProviderErrorEnvelope, SendResponse};
use crate::phone::normalize_phone;

/// Blocking client for a WhatsApp Cloud API compatible provider.
///
/// Construct once at startup and inject wherever a [`MessagingGateway`] is needed.
pub struct WhatsAppClient {
    config: GatewayConfig,
    client: reqwest::blocking::Client,
}

impl WhatsAppClient {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn recipient(&self, to: &str) -> GatewayResult<String> {
        normalize_phone(to, &self.config.default_country_code)
            .ok_or_else(|| GatewayError::InvalidRecipient(to.to_string()))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout(self.config.timeout())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }

    fn post_message(&self, message: &OutboundMessage) -> GatewayResult<MessageReceipt> {
        tracing::debug!(to = %message.to, "Posting message to provider");

        let response = self
            .client
            .post(self.config.messages_url())
            .bearer_auth(&self.config.access_token)
            .json(message)
            .send()
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| self.map_transport_error(e))?;

        let receipt = parse_send_response(status, &body, &message.to);
        if let Err(GatewayError::Provider { message, code, .. }) = &receipt {
            tracing::warn!(status, code = ?code, error = %message, "Provider rejected message");
        }
        receipt
    }
}

impl MessagingGateway for WhatsAppClient {
    fn send_text(&self, to: &str, body: &str) -> GatewayResult<MessageReceipt> {
        let recipient = self.recipient(to)?;
        self.post_message(&OutboundMessage::text(recipient, body))
    }

    fn send_template(
        &self,
        to: &str,
        template_name: &str,
        parameters: &[String],
    ) -> GatewayResult<MessageReceipt> {
        let recipient = self.recipient(to)?;
        let message = OutboundMessage::template(
            recipient,
            template_name,
            self.config.language.code(),
            parameters,
        );
        self.post_message(&message)
    }

    fn check_connection(&self) -> ConnectionStatus {
        let result = self
            .client
            .get(self.config.phone_number_url())
            .bearer_auth(&self.config.access_token)
            .send()
            .map_err(|e| self.map_transport_error(e))
            .and_then(|response| {
                let status = response.status().as_u16();
                let body = response.text().map_err(|e| self.map_transport_error(e))?;
                parse_phone_number_info(status, &body)
            });

        match result {
            Ok(info) => ConnectionStatus::Connected {
                phone_number: info
                    .display_phone_number
                    .or(info.id)
                    .unwrap_or_else(|| self.config.phone_number_id.clone()),
            },
            Err(e) => ConnectionStatus::Disconnected {
                error: e.to_string(),
            },
        }
    }
}

/// Build the error for a non-success response, preferring the provider's
/// structured error body over the raw body text.
pub(crate) fn provider_error(status: u16, body: &str) -> GatewayError {
    match serde_json::from_str::<ProviderErrorEnvelope>(body) {
        Ok(envelope) => GatewayError::Provider {
            status,
            message: envelope.error.message,
            code: envelope.error.code,
            trace_id: envelope.error.fbtrace_id,
        },
        Err(_) => GatewayError::Provider {
            status,
            message: if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                body.trim().to_string()
            },
            code: None,
            trace_id: None,
        },
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

pub(crate) fn parse_send_response(
    status: u16,
    body: &str,
    recipient: &str,
) -> GatewayResult<MessageReceipt> {
    if !is_success(status) {
        return Err(provider_error(status, body));
    }

    let parsed: SendResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    let message_id = parsed
        .messages
        .into_iter()
        .map(|m| m.id)
        .find(|id| !id.is_empty())
        .ok_or_else(|| GatewayError::MalformedResponse("no message id in response".into()))?;

    let recipient = parsed
        .contacts
        .into_iter()
        .find_map(|c| c.wa_id)
        .unwrap_or_else(|| recipient.to_string());

    Ok(MessageReceipt {
        message_id,
        recipient,
    })
}

pub(crate) fn parse_phone_number_info(status: u16, body: &str) -> GatewayResult<PhoneNumberInfo> {
    if !is_success(status) {
        return Err(provider_error(status, body));
    }
    serde_json::from_str(body).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
}
