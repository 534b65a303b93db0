//! Vet Reminders Core Library
//!
//! Vaccine-reminder lifecycle for veterinary clinics: patient records,
//! consent, scheduling and messaging history.
//!
//! # Architecture
//!
//! ```text
//! RegisterPatient ──▶ [patients] ──▶ Welcome text (best effort)
//!                         │
//!  ScheduleVaccine ──────▶│ next_vaccine (last write wins)
//!                         │
//!   DueReminders ◀────────┤ next_vaccine_date ∈ [today, today + 30]
//!                         │
//!   SendReminder ─────────┤ consent.reminders?
//!                         │        │
//!                         │        ▼
//!                         │  Messaging gateway (template)
//!                         │        │
//!                         ◀────────┘ append REMINDER_SENT
//! ```
//!
//! # Core Principle
//!
//! **No message without consent.** Reminders require `consent.reminders`;
//! free-form offers additionally require marketing consent and an open
//! 24-hour session window.
//!
//! # Modules
//!
//! - [`db`]: SQLite patient record store
//! - [`models`]: Domain types (Patient, VaccineEvent, ConsentState, etc.)
//! - [`engine`]: Reminder engine and eligibility rules
//! - [`config`]: Clinic-wide engine settings

pub mod config;
pub mod db;
pub mod engine;
pub mod models;

// Re-export commonly used types
pub use config::EngineConfig;
pub use db::{Database, DbError};
pub use engine::{
    can_receive_offers, can_receive_offers_at, format_long_date, is_reminder_due,
    is_reminder_due_on, ReminderEngine, DEFAULT_DAYS_BEFORE,
};
pub use models::{
    ConsentState, ConsentUpdate, DeliveryStatus, InteractionRecord, InteractionType,
    MessagingPreferences, NewInteraction, NewPatient, NewVaccine, Patient, PatientSummary, Pet,
    Species, VaccineEvent,
};
pub use vet_reminders_messaging::{GatewayError, LocaleTag, MessagingGateway};

use serde::{Deserialize, Serialize};
use std::fmt;

// =========================================================================
// Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Patient not found: {0}")]
    NotFound(String),

    #[error("Phone number already registered: {0}")]
    DuplicatePhone(String),

    #[error("Consent denied: {0}")]
    ConsentDenied(String),

    #[error("No vaccine scheduled for patient: {0}")]
    NoScheduledVaccine(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Stable, serializable classification of a [`ReminderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    DuplicatePhone,
    ConsentDenied,
    NoScheduledVaccine,
    Gateway,
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::DuplicatePhone => "duplicate_phone",
            ErrorKind::ConsentDenied => "consent_denied",
            ErrorKind::NoScheduledVaccine => "no_scheduled_vaccine",
            ErrorKind::Gateway => "gateway",
            ErrorKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ReminderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReminderError::Validation(_) => ErrorKind::Validation,
            ReminderError::NotFound(_) => ErrorKind::NotFound,
            ReminderError::DuplicatePhone(_) => ErrorKind::DuplicatePhone,
            ReminderError::ConsentDenied(_) => ErrorKind::ConsentDenied,
            ReminderError::NoScheduledVaccine(_) => ErrorKind::NoScheduledVaccine,
            ReminderError::Gateway(_) => ErrorKind::Gateway,
            ReminderError::Storage(_) => ErrorKind::Storage,
        }
    }
}

pub type ReminderResult<T> = Result<T, ReminderError>;

impl From<DbError> for ReminderError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::DuplicatePhone(phone) => ReminderError::DuplicatePhone(phone),
            DbError::NotFound(id) => ReminderError::NotFound(id),
            other => ReminderError::Storage(other.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for ReminderError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ReminderError::Storage(format!("Lock poisoned: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_mapping() {
        let err: ReminderError = DbError::DuplicatePhone("5215512345678".into()).into();
        assert_eq!(err.kind(), ErrorKind::DuplicatePhone);

        let err: ReminderError = DbError::NotFound("abc".into()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: ReminderError = DbError::Constraint("pet_type".into()).into();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_error_kind_serializes_as_str() {
        let kinds = [
            ErrorKind::Validation,
            ErrorKind::NotFound,
            ErrorKind::DuplicatePhone,
            ErrorKind::ConsentDenied,
            ErrorKind::NoScheduledVaccine,
            ErrorKind::Gateway,
            ErrorKind::Storage,
        ];
        for kind in kinds {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_string()));
            let back: ErrorKind = serde_json::from_value(json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_gateway_error_kept_verbatim() {
        let original = GatewayError::Provider {
            status: 400,
            message: "Template name does not exist".into(),
            code: Some(132001),
            trace_id: None,
        };
        let err: ReminderError = original.clone().into();
        assert_eq!(err.kind().as_str(), "gateway");
        assert_eq!(err.to_string(), original.to_string());
        match err {
            ReminderError::Gateway(inner) => assert_eq!(inner, original),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
