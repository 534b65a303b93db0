//! Eligibility rules for reminders and offers.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

use crate::models::Patient;

/// Default reminder look-ahead window in days.
pub const DEFAULT_DAYS_BEFORE: u32 = 3;

/// Hours after the owner's last interaction during which free-form
/// (non-template) messages may be sent.
pub const SESSION_WINDOW_HOURS: i64 = 24;

/// Whole days from `today` to `date` (negative when `date` is past).
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Whether a reminder should go out on `today`: a vaccine is pending,
/// reminders are consented to, and the vaccine is between 0 and
/// `days_before` days away.
pub fn is_reminder_due_on(patient: &Patient, days_before: u32, today: NaiveDate) -> bool {
    let Some(vaccine) = &patient.next_vaccine else {
        return false;
    };
    if !patient.consent.reminders {
        return false;
    }

    let diff = days_until(vaccine.date, today);
    (0..=i64::from(days_before)).contains(&diff)
}

/// [`is_reminder_due_on`] for the local calendar date.
pub fn is_reminder_due(patient: &Patient, days_before: u32) -> bool {
    is_reminder_due_on(patient, days_before, Local::now().date_naive())
}

/// Whether an offer may be sent at `now`: marketing consent plus a last
/// interaction no more than 24 hours ago (inclusive).
pub fn can_receive_offers_at(patient: &Patient, now: DateTime<Utc>) -> bool {
    if !patient.consent.marketing {
        return false;
    }
    match patient.last_interaction {
        Some(last) => now - last <= Duration::hours(SESSION_WINDOW_HOURS),
        None => false,
    }
}

pub fn can_receive_offers(patient: &Patient) -> bool {
    can_receive_offers_at(patient, Utc::now())
}
