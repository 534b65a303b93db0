//! In-process gateway that records outbound messages instead of sending them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::gateway::{ConnectionStatus, GatewayError, GatewayResult, MessageReceipt, MessagingGateway};
use crate::phone::{normalize_phone, DEFAULT_COUNTRY_CODE};

/// A message captured by [`MockGateway`].
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub to: String,
    pub message_id: String,
    pub kind: SentKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SentKind {
    Text { body: String },
    Template { name: String, parameters: Vec<String> },
}

#[derive(Default)]
struct MockState {
    sent: Vec<SentMessage>,
    failure: Option<GatewayError>,
    counter: u64,
}

/// Recording gateway for tests and dry runs.
///
/// Clones share state, so a test can hand one clone to the engine and
/// inspect the other.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `error` until cleared.
    pub fn fail_with(&self, error: GatewayError) {
        self.lock().failure = Some(error);
    }

    pub fn clear_failure(&self) {
        self.lock().failure = None;
    }

    /// All messages accepted so far, in send order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.lock().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.lock().sent.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, to: &str, kind: SentKind) -> GatewayResult<MessageReceipt> {
        let mut state = self.lock();
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }

        let recipient = normalize_phone(to, DEFAULT_COUNTRY_CODE)
            .ok_or_else(|| GatewayError::InvalidRecipient(to.to_string()))?;

        state.counter += 1;
        let message_id = format!("wamid.mock-{}", state.counter);
        state.sent.push(SentMessage {
            to: recipient.clone(),
            message_id: message_id.clone(),
            kind,
        });

        Ok(MessageReceipt {
            message_id,
            recipient,
        })
    }
}

impl MessagingGateway for MockGateway {
    fn send_text(&self, to: &str, body: &str) -> GatewayResult<MessageReceipt> {
        self.record(
            to,
            SentKind::Text {
                body: body.to_string(),
            },
        )
    }

    fn send_template(
        &self,
        to: &str,
        template_name: &str,
        parameters: &[String],
    ) -> GatewayResult<MessageReceipt> {
        self.record(
            to,
            SentKind::Template {
                name: template_name.to_string(),
                parameters: parameters.to_vec(),
            },
        )
    }

    fn check_connection(&self) -> ConnectionStatus {
        match &self.lock().failure {
            Some(error) => ConnectionStatus::Disconnected {
                error: error.to_string(),
            },
            None => ConnectionStatus::Connected {
                phone_number: "+52 55 0000 0000".to_string(),
            },
        }
    }
}
