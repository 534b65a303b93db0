//! Messaging provider configuration.

use std::fmt;
use std::time::Duration;

use crate::locale::LocaleTag;
use crate::phone::DEFAULT_COUNTRY_CODE;

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_API_VERSION: &str = "v18.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Provider credentials and transport settings.
#[derive(Clone)]
pub struct GatewayConfig {
    pub access_token: String,
    pub phone_number_id: String,
    pub api_version: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub default_country_code: String,
    /// Template language
    pub language: LocaleTag,
}

impl GatewayConfig {
    pub fn new(access_token: impl Into<String>, phone_number_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            phone_number_id: phone_number_id.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
            language: LocaleTag::default(),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.default_country_code = country_code.into();
        self
    }

    pub fn with_language(mut self, language: LocaleTag) -> Self {
        self.language = language;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `{base_url}/{api_version}/{phone_number_id}`
    pub fn phone_number_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            self.phone_number_id
        )
    }

    pub fn messages_url(&self) -> String {
        format!("{}/messages", self.phone_number_url())
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("access_token", &"<redacted>")
            .field("phone_number_id", &self.phone_number_id)
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("default_country_code", &self.default_country_code)
            .field("language", &self.language)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::new("token", "1234567890");
        assert_eq!(config.api_version, "v18.0");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.default_country_code, "52");
        assert_eq!(config.language, LocaleTag::EsMx);
    }

    #[test]
    fn test_urls() {
        let config = GatewayConfig::new("token", "1234567890")
            .with_base_url("http://localhost:8080/")
            .with_api_version("v19.0");
        assert_eq!(config.phone_number_url(), "http://localhost:8080/v19.0/1234567890");
        assert_eq!(
            config.messages_url(),
            "http://localhost:8080/v19.0/1234567890/messages"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = GatewayConfig::new("EAAG-secret-token", "1234567890");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("EAAG-secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
