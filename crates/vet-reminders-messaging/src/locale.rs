//! Operational locale for outbound messages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Locale used for template language and localized message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocaleTag {
    #[default]
    #[serde(rename = "es_MX", alias = "es-MX")]
    EsMx,
    #[serde(rename = "es_ES", alias = "es-ES")]
    EsEs,
    #[serde(rename = "en_US", alias = "en-US")]
    EnUs,
}

impl LocaleTag {
    /// Language code sent with template messages (e.g. "es_MX").
    pub fn code(&self) -> &'static str {
        match self {
            LocaleTag::EsMx => "es_MX",
            LocaleTag::EsEs => "es_ES",
            LocaleTag::EnUs => "en_US",
        }
    }

    /// Two-letter language (e.g. "es").
    pub fn language(&self) -> &'static str {
        match self {
            LocaleTag::EsMx | LocaleTag::EsEs => "es",
            LocaleTag::EnUs => "en",
        }
    }

    pub fn is_spanish(&self) -> bool {
        self.language() == "es"
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unrecognized locale tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for LocaleTag {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").to_lowercase().as_str() {
            "es_mx" => Ok(LocaleTag::EsMx),
            "es_es" => Ok(LocaleTag::EsEs),
            "en_us" => Ok(LocaleTag::EnUs),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!("es_MX".parse::<LocaleTag>().unwrap(), LocaleTag::EsMx);
        assert_eq!("es-mx".parse::<LocaleTag>().unwrap(), LocaleTag::EsMx);
        assert_eq!(" en-US ".parse::<LocaleTag>().unwrap(), LocaleTag::EnUs);
        assert!("fr_FR".parse::<LocaleTag>().is_err());
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&LocaleTag::EsEs).unwrap();
        assert_eq!(json, r#""es_ES""#);

        let parsed: LocaleTag = serde_json::from_str(r#""en-US""#).unwrap();
        assert_eq!(parsed, LocaleTag::EnUs);
    }

    #[test]
    fn test_language() {
        assert_eq!(LocaleTag::EsMx.language(), "es");
        assert!(LocaleTag::EsEs.is_spanish());
        assert!(!LocaleTag::EnUs.is_spanish());
    }
}
