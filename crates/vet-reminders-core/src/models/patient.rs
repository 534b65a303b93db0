//! Patient models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::consent::ConsentState;
use super::interaction::InteractionRecord;
use super::vaccine::VaccineEvent;

/// Pet species.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Rodent,
    Reptile,
    Other,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "DOG",
            Species::Cat => "CAT",
            Species::Bird => "BIRD",
            Species::Rodent => "RODENT",
            Species::Reptile => "REPTILE",
            Species::Other => "OTHER",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DOG" => Ok(Species::Dog),
            "CAT" => Ok(Species::Cat),
            "BIRD" => Ok(Species::Bird),
            "RODENT" => Ok(Species::Rodent),
            "REPTILE" => Ok(Species::Reptile),
            "OTHER" => Ok(Species::Other),
            _ => Err(format!("Unknown species: {}", s)),
        }
    }
}

/// The animal being vaccinated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub name: String,
    #[serde(rename = "type")]
    pub species: Species,
    pub breed: Option<String>,
    /// Age in years
    pub age: Option<u32>,
    /// Weight in kg
    pub weight: Option<f64>,
}

/// Per-patient messaging preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MessagingPreferences {
    /// Overrides the clinic-wide reminder look-ahead window
    pub reminder_days_before: Option<u32>,
}

/// A patient record: owner contact, pet, vaccine schedule, consent and
/// interaction log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    /// Owner's full name
    pub full_name: String,
    /// Owner's phone; unique across patients
    pub phone: String,
    pub email: Option<String>,
    pub pet: Pet,
    /// Pending vaccine appointment, if any
    pub next_vaccine: Option<VaccineEvent>,
    #[serde(default)]
    pub vaccine_history: Vec<VaccineEvent>,
    /// Absent in older documents; defaults per [`ConsentState::default`]
    #[serde(default)]
    pub consent: ConsentState,
    #[serde(default)]
    pub interactions: Vec<InteractionRecord>,
    pub last_interaction: Option<DateTime<Utc>>,
    #[serde(default)]
    pub preferences: MessagingPreferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Create a new patient with default consent given now.
    pub fn new(full_name: String, phone: String, pet: Pet) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            full_name,
            phone,
            email: None,
            pet,
            next_vaccine: None,
            vaccine_history: Vec::new(),
            consent: ConsentState::given(now),
            interactions: Vec::new(),
            last_interaction: None,
            preferences: MessagingPreferences::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append an interaction and move `last_interaction` to its timestamp.
    pub fn record_interaction(&mut self, record: InteractionRecord) {
        self.last_interaction = Some(record.timestamp);
        self.interactions.push(record);
    }

    /// Move the pending vaccine into the history as administered.
    /// Returns the archived event, or `None` if nothing was scheduled.
    pub fn archive_next_vaccine(&mut self, lot_number: Option<String>) -> Option<&VaccineEvent> {
        let mut event = self.next_vaccine.take()?;
        event.administered = true;
        if lot_number.is_some() {
            event.lot_number = lot_number;
        }
        self.vaccine_history.push(event);
        self.vaccine_history.last()
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Registration input. Required fields: full name, phone, pet name and pet type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPatient {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub pet_name: String,
    pub pet_type: Option<Species>,
    pub pet_breed: Option<String>,
    pub pet_age: Option<u32>,
    pub pet_weight: Option<f64>,
    pub preferences: MessagingPreferences,
}

impl NewPatient {
    pub fn new(full_name: &str, phone: &str, pet_name: &str, pet_type: Species) -> Self {
        Self {
            full_name: full_name.to_string(),
            phone: phone.to_string(),
            pet_name: pet_name.to_string(),
            pet_type: Some(pet_type),
            ..Default::default()
        }
    }

    /// Names of required fields that are missing or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.full_name.trim().is_empty() {
            missing.push("fullName");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        if self.pet_name.trim().is_empty() {
            missing.push("petName");
        }
        if self.pet_type.is_none() {
            missing.push("petType");
        }
        missing
    }

    /// Build the patient document. Returns `None` if required fields are missing.
    pub fn into_patient(self) -> Option<Patient> {
        if !self.missing_fields().is_empty() {
            return None;
        }
        let pet = Pet {
            name: self.pet_name.trim().to_string(),
            species: self.pet_type?,
            breed: self.pet_breed,
            age: self.pet_age,
            weight: self.pet_weight,
        };
        let mut patient = Patient::new(
            self.full_name.trim().to_string(),
            self.phone.trim().to_string(),
            pet,
        );
        patient.email = self.email.filter(|e| !e.trim().is_empty());
        patient.preferences = self.preferences;
        Some(patient)
    }
}

/// Projection used for patient listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub pet_name: String,
    pub pet_type: Species,
    pub next_vaccine_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interaction::InteractionType;
    use crate::models::vaccine::NewVaccine;

    fn new_patient() -> Patient {
        NewPatient::new("Ana López", "5512345678", "Firulais", Species::Dog)
            .into_patient()
            .unwrap()
    }

    #[test]
    fn test_new_patient() {
        let patient = new_patient();
        assert_eq!(patient.full_name, "Ana López");
        assert_eq!(patient.pet.species, Species::Dog);
        assert_eq!(patient.id.len(), 36); // UUID format
        assert!(patient.consent.reminders);
        assert_eq!(patient.consent.given_at, Some(patient.created_at));
        assert!(patient.next_vaccine.is_none());
    }

    #[test]
    fn test_missing_fields() {
        let input = NewPatient {
            full_name: "Ana".into(),
            ..Default::default()
        };
        assert_eq!(input.missing_fields(), vec!["phone", "petName", "petType"]);
        assert!(input.into_patient().is_none());
    }

    #[test]
    fn test_species_parse() {
        assert_eq!("dog".parse::<Species>().unwrap(), Species::Dog);
        assert_eq!(" Reptile ".parse::<Species>().unwrap(), Species::Reptile);
        assert!("dragon".parse::<Species>().is_err());
    }

    #[test]
    fn test_record_interaction_updates_last_interaction() {
        let mut patient = new_patient();
        let record = InteractionRecord::new(InteractionType::Inquiry, Utc::now());
        let timestamp = record.timestamp;

        patient.record_interaction(record);

        assert_eq!(patient.interactions.len(), 1);
        assert_eq!(patient.last_interaction, Some(timestamp));
    }

    #[test]
    fn test_archive_next_vaccine() {
        let mut patient = new_patient();
        let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        patient.next_vaccine = NewVaccine::new("Rabia", date, "10:00", "Centro").into_event();

        let archived = patient.archive_next_vaccine(Some("LOT-42".into())).unwrap();
        assert!(archived.administered);
        assert_eq!(archived.lot_number.as_deref(), Some("LOT-42"));
        assert!(patient.next_vaccine.is_none());
        assert_eq!(patient.vaccine_history.len(), 1);

        assert!(patient.archive_next_vaccine(None).is_none());
    }

    #[test]
    fn test_legacy_document_without_consent_gets_default() {
        let json = r#"{
            "id": "legacy-1",
            "fullName": "Ana",
            "phone": "5512345678",
            "email": null,
            "pet": {"name": "Firulais", "type": "DOG", "breed": null, "age": null, "weight": null},
            "nextVaccine": null,
            "lastInteraction": null,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.consent, ConsentState::default());
        assert!(patient.interactions.is_empty());
    }
}
