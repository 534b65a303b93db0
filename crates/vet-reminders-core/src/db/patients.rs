//! Patient database operations.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{
    ConsentState, InteractionRecord, MessagingPreferences, Patient, PatientSummary, Pet, Species,
    VaccineEvent,
};

const PATIENT_COLUMNS: &str = r#"
    id, phone, full_name, email, pet_name, pet_type, pet_breed, pet_age, pet_weight,
    next_vaccine, vaccine_history, consent, interactions, last_interaction, preferences,
    created_at, updated_at
"#;

impl Database {
    /// Insert a new patient. Fails with `DuplicatePhone` if the phone is taken.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        let doc = PatientColumns::from_patient(patient)?;

        self.conn
            .execute(
                r#"
                INSERT INTO patients (
                    id, phone, full_name, email, pet_name, pet_type, pet_breed, pet_age,
                    pet_weight, next_vaccine, next_vaccine_date, vaccine_history, consent,
                    interactions, last_interaction, preferences, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
                "#,
                params![
                    patient.id,
                    patient.phone,
                    patient.full_name,
                    patient.email,
                    patient.pet.name,
                    patient.pet.species.as_str(),
                    patient.pet.breed,
                    patient.pet.age,
                    patient.pet.weight,
                    doc.next_vaccine,
                    doc.next_vaccine_date,
                    doc.vaccine_history,
                    doc.consent,
                    doc.interactions,
                    doc.last_interaction,
                    doc.preferences,
                    format_timestamp(&patient.created_at),
                    format_timestamp(&patient.updated_at),
                ],
            )
            .map_err(|e| map_unique_violation(e, &patient.phone))?;
        Ok(())
    }

    /// Replace the stored document for an existing patient.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let doc = PatientColumns::from_patient(patient)?;

        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE patients SET
                    phone = ?2,
                    full_name = ?3,
                    email = ?4,
                    pet_name = ?5,
                    pet_type = ?6,
                    pet_breed = ?7,
                    pet_age = ?8,
                    pet_weight = ?9,
                    next_vaccine = ?10,
                    next_vaccine_date = ?11,
                    vaccine_history = ?12,
                    consent = ?13,
                    interactions = ?14,
                    last_interaction = ?15,
                    preferences = ?16,
                    updated_at = ?17
                WHERE id = ?1
                "#,
                params![
                    patient.id,
                    patient.phone,
                    patient.full_name,
                    patient.email,
                    patient.pet.name,
                    patient.pet.species.as_str(),
                    patient.pet.breed,
                    patient.pet.age,
                    patient.pet.weight,
                    doc.next_vaccine,
                    doc.next_vaccine_date,
                    doc.vaccine_history,
                    doc.consent,
                    doc.interactions,
                    doc.last_interaction,
                    doc.preferences,
                    format_timestamp(&patient.updated_at),
                ],
            )
            .map_err(|e| map_unique_violation(e, &patient.phone))?;
        Ok(rows_affected > 0)
    }

    /// Append an interaction to the current stored document.
    ///
    /// Reads, appends and writes back the interaction log inside one
    /// transaction, touching only the interaction columns, so a concurrent
    /// write of other fields is neither lost nor overwritten.
    pub fn append_interaction(&self, id: &str, record: &InteractionRecord) -> DbResult<Patient> {
        let tx = self.conn.unchecked_transaction()?;

        let mut patient = self
            .get_patient(id)?
            .ok_or_else(|| DbError::NotFound(id.to_string()))?;
        patient.record_interaction(record.clone());
        patient.touch();

        tx.execute(
            r#"
            UPDATE patients SET
                interactions = ?2,
                last_interaction = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
            params![
                patient.id,
                serde_json::to_string(&patient.interactions)?,
                patient.last_interaction.as_ref().map(format_timestamp),
                format_timestamp(&patient.updated_at),
            ],
        )?;
        tx.commit()?;

        Ok(patient)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        let sql = format!("SELECT {} FROM patients WHERE id = ?", PATIENT_COLUMNS);
        self.conn
            .query_row(&sql, [id], PatientRow::read)
            .optional()?
            .map(Patient::try_from)
            .transpose()
    }

    /// Get a patient by exact stored phone number.
    pub fn find_patient_by_phone(&self, phone: &str) -> DbResult<Option<Patient>> {
        let sql = format!("SELECT {} FROM patients WHERE phone = ?", PATIENT_COLUMNS);
        self.conn
            .query_row(&sql, [phone], PatientRow::read)
            .optional()?
            .map(Patient::try_from)
            .transpose()
    }

    /// List patients newest first, projected to summary fields.
    pub fn list_patients(&self, limit: usize) -> DbResult<Vec<PatientSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, full_name, phone, pet_name, pet_type, next_vaccine_date, created_at
            FROM patients
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, full_name, phone, pet_name, pet_type, next_vaccine_date, created_at) = row?;
            summaries.push(PatientSummary {
                id,
                full_name,
                phone,
                pet_name,
                pet_type: parse_species(&pet_type)?,
                next_vaccine_date: next_vaccine_date.as_deref().map(parse_date).transpose()?,
                created_at: parse_timestamp(&created_at)?,
            });
        }
        Ok(summaries)
    }

    /// Patients whose pending vaccine falls within `[from, to]`, soonest first.
    pub fn list_patients_with_vaccine_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<Patient>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM patients
            WHERE next_vaccine_date BETWEEN ?1 AND ?2
            ORDER BY next_vaccine_date, created_at
            "#,
            PATIENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![format_date(&from), format_date(&to)], PatientRow::read)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }
}

/// Serialized document columns shared by insert and update.
struct PatientColumns {
    next_vaccine: Option<String>,
    next_vaccine_date: Option<String>,
    vaccine_history: String,
    consent: String,
    interactions: String,
    last_interaction: Option<String>,
    preferences: String,
}

impl PatientColumns {
    fn from_patient(patient: &Patient) -> DbResult<Self> {
        Ok(Self {
            next_vaccine: patient
                .next_vaccine
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            next_vaccine_date: patient.next_vaccine.as_ref().map(|v| format_date(&v.date)),
            vaccine_history: serde_json::to_string(&patient.vaccine_history)?,
            consent: serde_json::to_string(&patient.consent)?,
            interactions: serde_json::to_string(&patient.interactions)?,
            last_interaction: patient.last_interaction.as_ref().map(format_timestamp),
            preferences: serde_json::to_string(&patient.preferences)?,
        })
    }
}

/// Intermediate row struct for database mapping.
struct PatientRow {
    id: String,
    phone: String,
    full_name: String,
    email: Option<String>,
    pet_name: String,
    pet_type: String,
    pet_breed: Option<String>,
    pet_age: Option<u32>,
    pet_weight: Option<f64>,
    next_vaccine: Option<String>,
    vaccine_history: String,
    consent: Option<String>,
    interactions: String,
    last_interaction: Option<String>,
    preferences: String,
    created_at: String,
    updated_at: String,
}

impl PatientRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            phone: row.get(1)?,
            full_name: row.get(2)?,
            email: row.get(3)?,
            pet_name: row.get(4)?,
            pet_type: row.get(5)?,
            pet_breed: row.get(6)?,
            pet_age: row.get(7)?,
            pet_weight: row.get(8)?,
            next_vaccine: row.get(9)?,
            vaccine_history: row.get(10)?,
            consent: row.get(11)?,
            interactions: row.get(12)?,
            last_interaction: row.get(13)?,
            preferences: row.get(14)?,
            created_at: row.get(15)?,
            updated_at: row.get(16)?,
        })
    }
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let next_vaccine: Option<VaccineEvent> = row
            .next_vaccine
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        let vaccine_history: Vec<VaccineEvent> = serde_json::from_str(&row.vaccine_history)?;
        // Rows written before consent tracking have no consent document
        let consent: ConsentState = match row.consent.as_deref() {
            Some(json) => serde_json::from_str(json)?,
            None => ConsentState::default(),
        };
        let interactions: Vec<InteractionRecord> = serde_json::from_str(&row.interactions)?;
        let preferences: MessagingPreferences = serde_json::from_str(&row.preferences)?;

        Ok(Patient {
            id: row.id,
            full_name: row.full_name,
            phone: row.phone,
            email: row.email,
            pet: Pet {
                name: row.pet_name,
                species: parse_species(&row.pet_type)?,
                breed: row.pet_breed,
                age: row.pet_age,
                weight: row.pet_weight,
            },
            next_vaccine,
            vaccine_history,
            consent,
            interactions,
            last_interaction: row.last_interaction.as_deref().map(parse_timestamp).transpose()?,
            preferences,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

fn map_unique_violation(e: rusqlite::Error, phone: &str) -> DbError {
    match e {
        rusqlite::Error::SqliteFailure(ref err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            DbError::DuplicatePhone(phone.to_string())
        }
        other => DbError::Sqlite(other),
    }
}

/// Fixed-width RFC 3339 so stored timestamps sort lexically.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DbError::Constraint(format!("Invalid timestamp {}: {}", s, e)))
}

fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(s: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DbError::Constraint(format!("Invalid date {}: {}", s, e)))
}

fn parse_species(s: &str) -> Result<Species, DbError> {
    s.parse().map_err(DbError::Constraint)
}
