//! Messaging gateway for vaccine reminders.
//!
//! Adapts outbound text and template messages to a chat messaging provider
//! (WhatsApp Cloud API shape). The gateway is stateless per call; callers
//! construct a [`WhatsAppClient`] from a [`GatewayConfig`] once and inject it,
//! or use [`MockGateway`] in tests.

pub mod config;
pub mod gateway;
pub mod locale;
pub mod messages;
pub mod mock;
pub mod payload;
pub mod phone;

#[cfg(feature = "http")]
pub mod client;

pub use config::GatewayConfig;
pub use gateway::{ConnectionStatus, GatewayError, GatewayResult, MessageReceipt, MessagingGateway};
pub use locale::{LocaleTag, UnknownLocale};
pub use messages::{welcome_text, ReminderTemplateParams, REMINDER_TEMPLATE};
pub use mock::{MockGateway, SentKind, SentMessage};
pub use phone::normalize_phone;

#[cfg(feature = "http")]
pub use client::WhatsAppClient;
