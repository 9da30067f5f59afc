use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::preference::Preference;
use crate::services::notifier::WHATSAPP_PREFIX;

/// Accepts `+`, digits and common separators, 7 to 15 digits in total.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let number = value.trim().trim_start_matches(WHATSAPP_PREFIX);
    let allowed = number
        .chars()
        .enumerate()
        .all(|(i, c)| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')') || (c == '+' && i == 0));
    let digits = number.chars().filter(|c| c.is_ascii_digit()).count();
    if allowed && (7..=15).contains(&digits) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_format"))
    }
}

/// Text fields of the preference form, after multipart decoding.
#[derive(Debug, Clone, Default, Validate)]
pub struct PreferenceForm {
    #[validate(length(min = 1, max = 100))]
    pub job_title: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    pub skills: Vec<String>,
    pub preferred_companies: Vec<String>,
    pub whatsapp_number: Option<String>,
    pub linkedin_url: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavePreferencesResponse {
    pub status: String,
    pub message: String,
    pub skills_extracted: Vec<String>,
    pub resume_parsed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PreferenceView {
    pub job_title: String,
    pub location: String,
    pub skills: Vec<String>,
    pub preferred_companies: Vec<String>,
    pub whatsapp_number: Option<String>,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub has_resume: bool,
}

impl From<Preference> for PreferenceView {
    fn from(pref: Preference) -> Self {
        let has_resume = pref.has_resume();
        Self {
            job_title: pref.job_title,
            location: pref.location,
            skills: pref.skills,
            preferred_companies: pref.preferred_companies,
            whatsapp_number: pref.whatsapp_number,
            linkedin_url: pref.linkedin_url,
            email: pref.email,
            has_resume,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PreferencesResponse {
    pub status: String,
    pub preferences: Option<PreferenceView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_format() {
        assert!(validate_phone("+15550001111").is_ok());
        assert!(validate_phone("whatsapp:+44 20 7946 0958").is_ok());
        assert!(validate_phone("(555) 000-1111").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("1+5550001111").is_err());
    }
}
