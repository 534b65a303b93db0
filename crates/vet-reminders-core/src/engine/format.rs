//! Localized date formatting for outbound messages.

use chrono::NaiveDate;
use vet_reminders_messaging::LocaleTag;

fn chrono_locale(locale: LocaleTag) -> chrono::Locale {
    match locale {
        LocaleTag::EsMx => chrono::Locale::es_MX,
        LocaleTag::EsEs => chrono::Locale::es_ES,
        LocaleTag::EnUs => chrono::Locale::en_US,
    }
}

fn long_date_pattern(locale: LocaleTag) -> &'static str {
    if locale.is_spanish() {
        "%A, %-d de %B de %Y"
    } else {
        "%A, %B %-d, %Y"
    }
}

/// Long-form date with weekday, e.g. "martes, 20 de octubre de 2026".
pub fn format_long_date(date: NaiveDate, locale: LocaleTag) -> String {
    date.format_localized(long_date_pattern(locale), chrono_locale(locale))
        .to_string()
}
