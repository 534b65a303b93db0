//! Vaccine scheduling models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A scheduled (or administered) vaccine appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaccineEvent {
    /// Vaccine name (e.g., "Rabia", "Séxtuple")
    pub name: String,
    /// Appointment date
    pub date: NaiveDate,
    /// Appointment time of day as shown to the owner (e.g., "10:30")
    pub time: String,
    /// Clinic branch or address
    pub location: String,
    pub notes: Option<String>,
    pub lot_number: Option<String>,
    /// When the following dose is due
    pub next_dose_date: Option<NaiveDate>,
    #[serde(default)]
    pub administered: bool,
}

/// Input for scheduling a vaccine. Required fields are optional here so
/// that missing values can be reported as a validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewVaccine {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub time: String,
    pub location: String,
    pub notes: Option<String>,
    pub lot_number: Option<String>,
    pub next_dose_date: Option<NaiveDate>,
}

impl NewVaccine {
    pub fn new(name: &str, date: NaiveDate, time: &str, location: &str) -> Self {
        Self {
            name: name.to_string(),
            date: Some(date),
            time: time.to_string(),
            location: location.to_string(),
            ..Default::default()
        }
    }

    /// Names of required fields that are missing or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if self.time.trim().is_empty() {
            missing.push("time");
        }
        if self.location.trim().is_empty() {
            missing.push("location");
        }
        missing
    }

    /// Build a pending event. Returns `None` if required fields are missing.
    pub fn into_event(self) -> Option<VaccineEvent> {
        if !self.missing_fields().is_empty() {
            return None;
        }
        Some(VaccineEvent {
            name: self.name.trim().to_string(),
            date: self.date?,
            time: self.time.trim().to_string(),
            location: self.location.trim().to_string(),
            notes: self.notes,
            lot_number: self.lot_number,
            next_dose_date: self.next_dose_date,
            administered: false,
        })
    }
}
