//! Engine configuration.
//!
//! Resolved once at startup and passed into [`ReminderEngine`](crate::ReminderEngine);
//! nothing in this crate reads environment variables.

use serde::{Deserialize, Serialize};
use vet_reminders_messaging::{LocaleTag, REMINDER_TEMPLATE};

use crate::engine::DEFAULT_DAYS_BEFORE;
use crate::{ReminderError, ReminderResult};

/// Clinic-wide reminder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Display name used in the reminder template and the welcome text footer
    pub clinic_name: String,
    /// Look-ahead window, in days before the vaccine date
    pub reminder_days_before: u32,
    /// Locale for date formatting and message text
    pub locale: LocaleTag,
    /// Provider template used for reminders
    pub reminder_template: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clinic_name: String::new(),
            reminder_days_before: DEFAULT_DAYS_BEFORE,
            locale: LocaleTag::default(),
            reminder_template: REMINDER_TEMPLATE.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn new(clinic_name: impl Into<String>) -> ReminderResult<Self> {
        let config = Self {
            clinic_name: clinic_name.into(),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_days_before(mut self, days: u32) -> Self {
        self.reminder_days_before = days;
        self
    }

    pub fn with_locale(mut self, locale: LocaleTag) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_reminder_template(mut self, template: impl Into<String>) -> Self {
        self.reminder_template = template.into();
        self
    }

    pub fn validate(&self) -> ReminderResult<()> {
        if self.clinic_name.trim().is_empty() {
            return Err(ReminderError::Validation("clinic_name cannot be empty".into()));
        }
        if self.reminder_template.trim().is_empty() {
            return Err(ReminderError::Validation(
                "reminder_template cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new("Clínica Patitas").unwrap();
        assert_eq!(config.reminder_days_before, 3);
        assert_eq!(config.locale, LocaleTag::EsMx);
        assert_eq!(config.reminder_template, "vaccine_reminder");
    }

    #[test]
    fn test_empty_clinic_name_rejected() {
        let err = EngineConfig::new("  ").unwrap_err();
        assert!(matches!(err, ReminderError::Validation(_)));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"clinic_name":"Happy Paws","locale":"en_US"}"#).unwrap();
        assert_eq!(config.reminder_days_before, 3);
        assert_eq!(config.locale, LocaleTag::EnUs);
        assert!(config.validate().is_ok());

        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert!(config.validate().is_err());
    }
}
