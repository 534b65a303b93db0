//! SQLite schema definition.

/// Complete database schema for vet-reminders.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patients (owner + pet document)
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    phone TEXT NOT NULL,
    full_name TEXT NOT NULL,
    email TEXT,
    pet_name TEXT NOT NULL,
    pet_type TEXT NOT NULL CHECK (pet_type IN ('DOG', 'CAT', 'BIRD', 'RODENT', 'REPTILE', 'OTHER')),
    pet_breed TEXT,
    pet_age INTEGER,
    pet_weight REAL,
    next_vaccine TEXT,                            -- JSON VaccineEvent, NULL when none pending
    next_vaccine_date TEXT,                       -- YYYY-MM-DD copy of next_vaccine.date
    vaccine_history TEXT NOT NULL DEFAULT '[]',   -- JSON array of VaccineEvent
    consent TEXT,                                 -- JSON ConsentState, NULL on legacy rows
    interactions TEXT NOT NULL DEFAULT '[]',      -- JSON array of InteractionRecord (append-only)
    last_interaction TEXT,
    preferences TEXT NOT NULL DEFAULT '{}',       -- JSON MessagingPreferences
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_patients_phone ON patients(phone);
CREATE INDEX IF NOT EXISTS idx_patients_next_vaccine_date ON patients(next_vaccine_date);
CREATE INDEX IF NOT EXISTS idx_patients_created_at ON patients(created_at);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_phone_unique_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let insert = "INSERT INTO patients (id, phone, full_name, pet_name, pet_type, created_at, updated_at)
                      VALUES (?, '5512345678', 'Ana', 'Firulais', 'DOG', '2026-01-01', '2026-01-01')";

        assert!(conn.execute(insert, ["p1"]).is_ok());
        assert!(conn.execute(insert, ["p2"]).is_err());
    }

    #[test]
    fn test_pet_type_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO patients (id, phone, full_name, pet_name, pet_type, created_at, updated_at)
             VALUES ('p1', '1', 'Ana', 'Rex', 'DRAGON', '2026-01-01', '2026-01-01')",
            [],
        );
        assert!(result.is_err());
    }
}
