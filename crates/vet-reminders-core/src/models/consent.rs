//! Contact consent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Consent flags governing outbound contact.
///
/// `Default` is the consent assumed for records that predate consent
/// tracking: reminders and privacy allowed, marketing not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsentState {
    pub marketing: bool,
    pub reminders: bool,
    pub privacy: bool,
    /// First time consent was recorded; never changed afterwards
    pub given_at: Option<DateTime<Utc>>,
    /// Last change
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for ConsentState {
    fn default() -> Self {
        Self {
            marketing: false,
            reminders: true,
            privacy: true,
            given_at: None,
            updated_at: None,
        }
    }
}

/// Partial consent change; only fields that are `Some` are applied.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsentUpdate {
    pub marketing: Option<bool>,
    pub reminders: Option<bool>,
    pub privacy: Option<bool>,
}

impl ConsentState {
    /// Default consent stamped as given at `now` (new registrations).
    pub fn given(now: DateTime<Utc>) -> Self {
        Self {
            given_at: Some(now),
            updated_at: Some(now),
            ..Self::default()
        }
    }

    /// Merge `update` over this state. `updated_at` is always refreshed;
    /// `given_at` is kept, or set to `now` if it was never recorded.
    pub fn apply(&self, update: &ConsentUpdate, now: DateTime<Utc>) -> Self {
        Self {
            marketing: update.marketing.unwrap_or(self.marketing),
            reminders: update.reminders.unwrap_or(self.reminders),
            privacy: update.privacy.unwrap_or(self.privacy),
            given_at: self.given_at.or(Some(now)),
            updated_at: Some(now),
        }
    }
}
