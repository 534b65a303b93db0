//! Wire envelopes for the messaging provider (WhatsApp Cloud API shape).

use serde::{Deserialize, Serialize};

const MESSAGING_PRODUCT: &str = "whatsapp";

/// Outbound message envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub messaging_product: String,
    pub recipient_type: String,
    pub to: String,
    #[serde(flatten)]
    pub body: MessageBody,
}

/// Message body, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageBody {
    Text { text: TextPayload },
    Template { template: TemplatePayload },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPayload {
    pub preview_url: bool,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatePayload {
    pub name: String,
    pub language: TemplateLanguage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<TemplateComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLanguage {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateComponent {
    #[serde(rename = "type")]
    pub component_type: String,
    pub parameters: Vec<TemplateParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateParameter {
    #[serde(rename = "type")]
    pub parameter_type: String,
    pub text: String,
}

impl OutboundMessage {
    /// Plain text message to an already-normalized recipient.
    pub fn text(to: String, body: &str) -> Self {
        Self {
            messaging_product: MESSAGING_PRODUCT.to_string(),
            recipient_type: "individual".to_string(),
            to,
            body: MessageBody::Text {
                text: TextPayload {
                    preview_url: false,
                    body: body.to_string(),
                },
            },
        }
    }

    /// Template message. Parameters are attached to the body component
    /// only when non-empty.
    pub fn template(to: String, name: &str, language_code: &str, parameters: &[String]) -> Self {
        let components = if parameters.is_empty() {
            Vec::new()
        } else {
            vec![TemplateComponent {
                component_type: "body".to_string(),
                parameters: parameters
                    .iter()
                    .map(|p| TemplateParameter {
                        parameter_type: "text".to_string(),
                        text: p.clone(),
                    })
                    .collect(),
            }]
        };

        Self {
            messaging_product: MESSAGING_PRODUCT.to_string(),
            recipient_type: "individual".to_string(),
            to,
            body: MessageBody::Template {
                template: TemplatePayload {
                    name: name.to_string(),
                    language: TemplateLanguage {
                        code: language_code.to_string(),
                    },
                    components,
                },
            },
        }
    }
}

/// Message acceptance response.
#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub contacts: Vec<ContactInfo>,
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactInfo {
    pub input: Option<String>,
    pub wa_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRef {
    pub id: String,
}

/// Structured provider error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderErrorEnvelope {
    pub error: ProviderErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderErrorBody {
    pub message: String,
    pub code: Option<i64>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub fbtrace_id: Option<String>,
}

/// Phone number identity, returned by the connection check.
#[derive(Debug, Clone, Deserialize)]
pub struct PhoneNumberInfo {
    pub id: Option<String>,
    pub display_phone_number: Option<String>,
    pub verified_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_envelope_shape() {
        let msg = OutboundMessage::text("525512345678".into(), "Hola");
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(
            value,
            json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": "525512345678",
                "type": "text",
                "text": { "preview_url": false, "body": "Hola" }
            })
        );
    }

    #[test]
    fn test_template_envelope_with_parameters() {
        let params = vec!["Ana".to_string(), "Firulais".to_string()];
        let msg = OutboundMessage::template("525512345678".into(), "vaccine_reminder", "es_MX", &params);
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["type"], "template");
        assert_eq!(value["template"]["name"], "vaccine_reminder");
        assert_eq!(value["template"]["language"]["code"], "es_MX");
        let components = value["template"]["components"].as_array().unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0]["type"], "body");
        assert_eq!(components[0]["parameters"][0], json!({"type": "text", "text": "Ana"}));
        assert_eq!(components[0]["parameters"][1]["text"], "Firulais");
    }

    #[test]
    fn test_template_envelope_without_parameters_omits_components() {
        let msg = OutboundMessage::template("1".into(), "hello_world", "en_US", &[]);
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value["template"].get("components").is_none());
    }

    #[test]
    fn test_parse_provider_error() {
        let body = r#"{"error":{"message":"Invalid OAuth access token.","type":"OAuthException","code":190,"fbtrace_id":"AbC123"}}"#;
        let parsed: ProviderErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "Invalid OAuth access token.");
        assert_eq!(parsed.error.code, Some(190));
        assert_eq!(parsed.error.fbtrace_id.as_deref(), Some("AbC123"));
    }

    #[test]
    fn test_parse_send_response() {
        let body = r#"{"messaging_product":"whatsapp","contacts":[{"input":"525512345678","wa_id":"525512345678"}],"messages":[{"id":"wamid.HBgM"}]}"#;
        let parsed: SendResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.messages[0].id, "wamid.HBgM");
        assert_eq!(parsed.contacts[0].wa_id.as_deref(), Some("525512345678"));
    }
}
