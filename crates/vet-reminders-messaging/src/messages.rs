//! Outbound message text and template parameters.

use crate::locale::LocaleTag;

/// Default provider template for vaccine reminders.
pub const REMINDER_TEMPLATE: &str = "vaccine_reminder";

/// Welcome text sent after a patient is registered.
pub fn welcome_text(locale: LocaleTag, full_name: &str, pet_name: &str, clinic_name: &str) -> String {
    if locale.is_spanish() {
        format!(
            "¡Hola {}! 🐾\n\n\
             Te damos la bienvenida. {} ya está registrado(a) con nosotros y te \
             enviaremos por este medio los recordatorios de sus vacunas.\n\n\
             Si tienes dudas, responde a este mensaje.\n\n\
             — {}",
            full_name, pet_name, clinic_name
        )
    } else {
        format!(
            "Hi {}! 🐾\n\n\
             Welcome aboard. {} is now registered with us and we will send \
             vaccine reminders through this chat.\n\n\
             If you have any questions, just reply to this message.\n\n\
             — {}",
            full_name, pet_name, clinic_name
        )
    }
}

/// Parameters of the reminder template body, in the order the template
/// placeholders expect them.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderTemplateParams<'a> {
    pub owner_name: &'a str,
    pub pet_name: &'a str,
    pub vaccine_name: &'a str,
    pub formatted_date: &'a str,
    pub time: &'a str,
    pub location: &'a str,
    pub clinic_name: &'a str,
}

impl ReminderTemplateParams<'_> {
    /// `{{1}}` owner, `{{2}}` pet, `{{3}}` vaccine, `{{4}}` date, `{{5}}` time,
    /// `{{6}}` location, `{{7}}` clinic.
    pub fn to_parameters(&self) -> Vec<String> {
        [
            self.owner_name,
            self.pet_name,
            self.vaccine_name,
            self.formatted_date,
            self.time,
            self.location,
            self.clinic_name,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_text_mentions_names_and_clinic() {
        let text = welcome_text(LocaleTag::EsMx, "Ana López", "Firulais", "Clínica Patitas");
        assert!(text.starts_with("¡Hola Ana López!"));
        assert!(text.contains("Firulais"));
        assert!(text.ends_with("— Clínica Patitas"));
    }

    #[test]
    fn test_welcome_text_english() {
        let text = welcome_text(LocaleTag::EnUs, "Ann", "Rex", "Happy Paws");
        assert!(text.starts_with("Hi Ann!"));
        assert!(text.ends_with("— Happy Paws"));
    }

    #[test]
    fn test_reminder_parameter_order() {
        let params = ReminderTemplateParams {
            owner_name: "Ana",
            pet_name: "Firulais",
            vaccine_name: "Rabia",
            formatted_date: "martes, 20 de octubre de 2026",
            time: "10:00",
            location: "Sucursal Centro",
            clinic_name: "Clínica Patitas",
        };
        assert_eq!(
            params.to_parameters(),
            vec![
                "Ana",
                "Firulais",
                "Rabia",
                "martes, 20 de octubre de 2026",
                "10:00",
                "Sucursal Centro",
                "Clínica Patitas",
            ]
        );
    }
}
