use crate::models::auth::RegistrationProfile;
use crate::models::profile::ProfileUpdate;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_PHONE: &str = "+1234567890";
pub const DEFAULT_INVALID_OTP: &str = "000000";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    pub base_url: String,
    pub phone: String,
    pub registration: RegistrationProfile,
    pub profile_update: Option<ProfileUpdate>,
    pub check_invalid_otp: bool,
    pub invalid_otp: String,
    pub timeout_secs: Option<u64>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            phone: DEFAULT_PHONE.to_owned(),
            registration: RegistrationProfile::default(),
            profile_update: None,
            check_invalid_otp: false,
            invalid_otp: DEFAULT_INVALID_OTP.to_owned(),
            timeout_secs: None,
        }
    }
}

impl ProbeConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let cfg: ProbeConfig = serde_json::from_str(&raw).context("parsing config JSON")?;
        Ok(cfg)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build().context("building HTTP client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                "base_url": "https://api.example.com/",
                "phone": "+919876543210",
                "check_invalid_otp": true
            }}"#
        )
        .unwrap();

        let config = ProbeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url(), "https://api.example.com");
        assert_eq!(config.phone, "+919876543210");
        assert!(config.check_invalid_otp);
        assert_eq!(config.invalid_otp, DEFAULT_INVALID_OTP);
        assert_eq!(config.registration, RegistrationProfile::default());
        assert!(config.profile_update.is_none());
    }

    #[test]
    fn registration_and_update_sections() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                "registration": {{
                    "first_name": "Test",
                    "last_name": "User",
                    "email": "test@example.com",
                    "user_type": "provider"
                }},
                "profile_update": {{
                    "first_name": "Updated",
                    "last_name": "Name",
                    "email": "updated@example.com"
                }},
                "timeout_secs": 5
            }}"#
        )
        .unwrap();

        let config = ProbeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.registration.first_name, "Test");
        assert_eq!(config.registration.user_type, UserType::Provider);
        assert_eq!(
            config.profile_update.as_ref().map(|u| u.email.as_str()),
            Some("updated@example.com")
        );
        assert_eq!(config.timeout_secs, Some(5));
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ProbeConfig::from_file("/nonexistent/probe.json").is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();
        assert!(ProbeConfig::from_file(file.path()).is_err());
    }
}
