//! Reminder lifecycle engine.
//!
//! Pipeline for a reminder: load patient → check schedule and consent →
//! format template parameters → send via gateway → append interaction.

mod eligibility;
mod format;

pub use eligibility::*;
pub use format::*;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{Duration, Local, NaiveDate, Utc};
use vet_reminders_messaging::{welcome_text, ConnectionStatus, MessagingGateway, ReminderTemplateParams};

use crate::config::EngineConfig;
use crate::db::Database;
use crate::models::{
    ConsentState, ConsentUpdate, InteractionRecord, InteractionType, NewInteraction, NewPatient,
    NewVaccine, Patient, PatientSummary, VaccineEvent,
};
use crate::{ReminderError, ReminderResult};

/// Furthest ahead the due-reminder query looks, regardless of per-patient windows.
pub const MAX_LOOKAHEAD_DAYS: i64 = 30;

/// Owns vaccine scheduling, consent and interaction history for patients.
///
/// Store access is serialized through a mutex that is never held across a
/// gateway call, so independent requests interleave while a message is in
/// flight. Writes of `next_vaccine` are last-write-wins; interaction appends
/// are applied to the current stored document and never drop each other.
pub struct ReminderEngine<G: MessagingGateway> {
    db: Mutex<Database>,
    gateway: G,
    config: EngineConfig,
}

impl<G: MessagingGateway> ReminderEngine<G> {
    pub fn new(db: Database, gateway: G, config: EngineConfig) -> ReminderResult<Self> {
        config.validate()?;
        Ok(Self {
            db: Mutex::new(db),
            gateway,
            config,
        })
    }

    /// Open or create a database at `path`.
    pub fn open<P: AsRef<Path>>(path: P, gateway: G, config: EngineConfig) -> ReminderResult<Self> {
        Self::new(Database::open(path)?, gateway, config)
    }

    /// In-memory database (for testing).
    pub fn open_in_memory(gateway: G, config: EngineConfig) -> ReminderResult<Self> {
        Self::new(Database::open_in_memory()?, gateway, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn db(&self) -> ReminderResult<MutexGuard<'_, Database>> {
        Ok(self.db.lock()?)
    }

    fn load(&self, patient_id: &str) -> ReminderResult<Patient> {
        self.db()?
            .get_patient(patient_id)?
            .ok_or_else(|| ReminderError::NotFound(patient_id.to_string()))
    }

    // =========================================================================
    // Patients
    // =========================================================================

    /// Register a patient and send a best-effort welcome message.
    ///
    /// A welcome-message failure is logged and does not fail registration.
    pub fn register_patient(&self, data: NewPatient) -> ReminderResult<Patient> {
        let missing = data.missing_fields();
        if !missing.is_empty() {
            return Err(ReminderError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let patient = data
            .into_patient()
            .ok_or_else(|| ReminderError::Validation("incomplete patient data".into()))?;

        {
            let db = self.db()?;
            if db.find_patient_by_phone(&patient.phone)?.is_some() {
                return Err(ReminderError::DuplicatePhone(patient.phone.clone()));
            }
            db.insert_patient(&patient)?;
        }

        tracing::info!(patient_id = %patient.id, "Patient registered");

        let text = welcome_text(
            self.config.locale,
            &patient.full_name,
            &patient.pet.name,
            &self.config.clinic_name,
        );
        match self.gateway.send_text(&patient.phone, &text) {
            Ok(receipt) => {
                tracing::debug!(patient_id = %patient.id, message_id = %receipt.message_id, "Welcome message sent");
            }
            Err(e) => {
                tracing::warn!(patient_id = %patient.id, error = %e, "Welcome message failed");
            }
        }

        Ok(patient)
    }

    pub fn get_patient(&self, patient_id: &str) -> ReminderResult<Patient> {
        self.load(patient_id)
    }

    /// Newest patients first, at most `limit`.
    pub fn list_patients(&self, limit: usize) -> ReminderResult<Vec<PatientSummary>> {
        Ok(self.db()?.list_patients(limit)?)
    }

    // =========================================================================
    // Vaccines
    // =========================================================================

    /// Replace the patient's pending vaccine with a new, not-yet-administered one.
    pub fn schedule_vaccine(&self, patient_id: &str, vaccine: NewVaccine) -> ReminderResult<Patient> {
        let db = self.db()?;
        let mut patient = db
            .get_patient(patient_id)?
            .ok_or_else(|| ReminderError::NotFound(patient_id.to_string()))?;

        let missing = vaccine.missing_fields();
        if !missing.is_empty() {
            return Err(ReminderError::Validation(format!(
                "missing required vaccine fields: {}",
                missing.join(", ")
            )));
        }
        let event = vaccine
            .into_event()
            .ok_or_else(|| ReminderError::Validation("incomplete vaccine data".into()))?;

        tracing::info!(patient_id = %patient_id, vaccine = %event.name, date = %event.date, "Vaccine scheduled");

        patient.next_vaccine = Some(event);
        patient.touch();
        if !db.update_patient(&patient)? {
            return Err(ReminderError::NotFound(patient_id.to_string()));
        }
        Ok(patient)
    }

    /// Mark the pending vaccine as administered and move it to the history.
    pub fn complete_vaccine(
        &self,
        patient_id: &str,
        lot_number: Option<String>,
    ) -> ReminderResult<VaccineEvent> {
        let db = self.db()?;
        let mut patient = db
            .get_patient(patient_id)?
            .ok_or_else(|| ReminderError::NotFound(patient_id.to_string()))?;

        let archived = patient
            .archive_next_vaccine(lot_number)
            .cloned()
            .ok_or_else(|| ReminderError::NoScheduledVaccine(patient_id.to_string()))?;

        patient.touch();
        if !db.update_patient(&patient)? {
            return Err(ReminderError::NotFound(patient_id.to_string()));
        }

        tracing::info!(patient_id = %patient_id, vaccine = %archived.name, "Vaccine administered");
        Ok(archived)
    }

    // =========================================================================
    // Eligibility
    // =========================================================================

    /// Look-ahead window for this patient: their preference, else the clinic default.
    pub fn days_before_for(&self, patient: &Patient) -> u32 {
        patient
            .preferences
            .reminder_days_before
            .unwrap_or(self.config.reminder_days_before)
    }

    /// Whether `patient` is due today under their own look-ahead window.
    pub fn is_reminder_due(&self, patient: &Patient) -> bool {
        is_reminder_due(patient, self.days_before_for(patient))
    }

    pub fn can_receive_offers(&self, patient: &Patient) -> bool {
        can_receive_offers(patient)
    }

    /// Patients due for a reminder on `today`, soonest vaccine first.
    pub fn due_reminders_on(&self, today: NaiveDate) -> ReminderResult<Vec<Patient>> {
        let candidates = self
            .db()?
            .list_patients_with_vaccine_between(today, today + Duration::days(MAX_LOOKAHEAD_DAYS))?;

        Ok(candidates
            .into_iter()
            .filter(|p| is_reminder_due_on(p, self.days_before_for(p), today))
            .collect())
    }

    pub fn due_reminders(&self) -> ReminderResult<Vec<Patient>> {
        self.due_reminders_on(Local::now().date_naive())
    }

    // =========================================================================
    // Messaging
    // =========================================================================

    /// Send the vaccine reminder template and record it.
    ///
    /// Gateway failures are returned unchanged and nothing is recorded.
    pub fn send_reminder(&self, patient_id: &str) -> ReminderResult<InteractionRecord> {
        let patient = self.load(patient_id)?;

        let vaccine = patient
            .next_vaccine
            .as_ref()
            .ok_or_else(|| ReminderError::NoScheduledVaccine(patient_id.to_string()))?;

        if !patient.consent.reminders {
            tracing::debug!(patient_id = %patient_id, "Reminder refused: consent withdrawn");
            return Err(ReminderError::ConsentDenied(format!(
                "patient {} has opted out of reminders",
                patient_id
            )));
        }

        let formatted_date = format_long_date(vaccine.date, self.config.locale);
        let parameters = ReminderTemplateParams {
            owner_name: &patient.full_name,
            pet_name: &patient.pet.name,
            vaccine_name: &vaccine.name,
            formatted_date: &formatted_date,
            time: &vaccine.time,
            location: &vaccine.location,
            clinic_name: &self.config.clinic_name,
        }
        .to_parameters();

        let receipt = self
            .gateway
            .send_template(&patient.phone, &self.config.reminder_template, &parameters)
            .map_err(|e| {
                tracing::warn!(patient_id = %patient_id, error = %e, "Reminder send failed");
                e
            })?;

        let record = InteractionRecord::new(InteractionType::ReminderSent, Utc::now())
            .with_message(format!(
                "{}: {} {} {}",
                self.config.reminder_template, vaccine.name, formatted_date, vaccine.time
            ))
            .with_message_id(receipt.message_id.clone())
            .with_metadata("template", self.config.reminder_template.as_str())
            .with_metadata("vaccineName", vaccine.name.as_str())
            .with_metadata("vaccineDate", vaccine.date.to_string());

        self.db()?.append_interaction(patient_id, &record)?;

        tracing::info!(patient_id = %patient_id, message_id = %receipt.message_id, "Vaccine reminder sent");
        Ok(record)
    }

    /// Send a free-form offer inside the provider's session window and record it.
    pub fn send_offer(&self, patient_id: &str, text: &str) -> ReminderResult<InteractionRecord> {
        let patient = self.load(patient_id)?;

        if !can_receive_offers(&patient) {
            tracing::debug!(patient_id = %patient_id, "Offer refused: no marketing consent or session closed");
            return Err(ReminderError::ConsentDenied(format!(
                "patient {} cannot receive offers (marketing consent or session window)",
                patient_id
            )));
        }

        let receipt = self.gateway.send_text(&patient.phone, text).map_err(|e| {
            tracing::warn!(patient_id = %patient_id, error = %e, "Offer send failed");
            e
        })?;

        let record = InteractionRecord::new(InteractionType::Offer, Utc::now())
            .with_message(text)
            .with_message_id(receipt.message_id.clone());

        self.db()?.append_interaction(patient_id, &record)?;

        tracing::info!(patient_id = %patient_id, message_id = %receipt.message_id, "Offer sent");
        Ok(record)
    }

    /// Record an inbound or manually logged interaction.
    pub fn record_interaction(
        &self,
        patient_id: &str,
        interaction: NewInteraction,
    ) -> ReminderResult<InteractionRecord> {
        let record = interaction.into_record(Utc::now());
        self.db()?.append_interaction(patient_id, &record)?;
        tracing::info!(patient_id = %patient_id, kind = ?record.kind, "Interaction recorded");
        Ok(record)
    }

    pub fn gateway_status(&self) -> ConnectionStatus {
        self.gateway.check_connection()
    }

    // =========================================================================
    // Consent
    // =========================================================================

    /// Merge a partial consent change and return the resulting state.
    pub fn update_consent(&self, patient_id: &str, update: ConsentUpdate) -> ReminderResult<ConsentState> {
        let db = self.db()?;
        let mut patient = db
            .get_patient(patient_id)?
            .ok_or_else(|| ReminderError::NotFound(patient_id.to_string()))?;

        patient.consent = patient.consent.apply(&update, Utc::now());
        patient.touch();
        if !db.update_patient(&patient)? {
            return Err(ReminderError::NotFound(patient_id.to_string()));
        }

        tracing::info!(
            patient_id = %patient_id,
            marketing = patient.consent.marketing,
            reminders = patient.consent.reminders,
            privacy = patient.consent.privacy,
            "Consent updated"
        );
        Ok(patient.consent)
    }
}
