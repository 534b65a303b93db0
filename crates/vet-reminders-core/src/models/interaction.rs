//! Interaction history entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of interaction with the owner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionType {
    ReminderSent,
    Confirmation,
    Reschedule,
    Inquiry,
    Offer,
}

/// Delivery status reported for an outbound message.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    #[default]
    Sent,
    Delivered,
    Read,
    Failed,
}

/// One entry of a patient's interaction log. Entries are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    #[serde(rename = "type")]
    pub kind: InteractionType,
    pub timestamp: DateTime<Utc>,
    /// Outbound text or template summary
    pub message: Option<String>,
    /// Owner's reply, for inbound interactions
    pub response: Option<String>,
    /// Provider-assigned message identifier
    pub message_id: Option<String>,
    #[serde(default)]
    pub status: DeliveryStatus,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl InteractionRecord {
    /// New entry with status `Sent` and empty metadata.
    pub fn new(kind: InteractionType, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            timestamp,
            message: None,
            response: None,
            message_id: None,
            status: DeliveryStatus::default(),
            metadata: Map::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn with_status(mut self, status: DeliveryStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// Input for recording an inbound or manual interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewInteraction {
    #[serde(rename = "type")]
    pub kind: InteractionType,
    pub message: Option<String>,
    pub response: Option<String>,
    pub message_id: Option<String>,
    #[serde(default)]
    pub status: DeliveryStatus,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl NewInteraction {
    pub fn new(kind: InteractionType) -> Self {
        Self {
            kind,
            message: None,
            response: None,
            message_id: None,
            status: DeliveryStatus::default(),
            metadata: Map::new(),
        }
    }

    /// Stamp the entry with `timestamp`.
    pub fn into_record(self, timestamp: DateTime<Utc>) -> InteractionRecord {
        InteractionRecord {
            kind: self.kind,
            timestamp,
            message: self.message,
            response: self.response,
            message_id: self.message_id,
            status: self.status,
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_to_sent() {
        let record = InteractionRecord::new(InteractionType::ReminderSent, Utc::now());
        assert_eq!(record.status, DeliveryStatus::Sent);
        assert!(record.metadata.is_empty());
    }

    #[test]
    fn test_document_shape() {
        let record = InteractionRecord::new(InteractionType::ReminderSent, Utc::now())
            .with_message_id("wamid.1")
            .with_metadata("vaccine", "Rabia");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["type"], "REMINDER_SENT");
        assert_eq!(value["status"], "SENT");
        assert_eq!(value["messageId"], "wamid.1");
        assert_eq!(value["metadata"]["vaccine"], "Rabia");
    }

    #[test]
    fn test_delivery_status_update() {
        let record = InteractionRecord::new(InteractionType::Offer, Utc::now())
            .with_message_id("wamid.2")
            .with_status(DeliveryStatus::Failed);
        assert_eq!(record.status, DeliveryStatus::Failed);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "FAILED");
        assert_eq!(value["type"], "OFFER");
    }

    #[test]
    fn test_status_defaults_when_absent() {
        let json = r#"{"type":"CONFIRMATION","timestamp":"2026-10-18T12:00:00Z","message":null,"response":"Sí, ahí estaremos","messageId":null}"#;
        let record: InteractionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, InteractionType::Confirmation);
        assert_eq!(record.status, DeliveryStatus::Sent);
        assert_eq!(record.response.as_deref(), Some("Sí, ahí estaremos"));
    }
}
