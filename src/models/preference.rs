use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Saved search preferences. At most one row exists per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Preference {
    pub user_id: Uuid,
    pub job_title: String,
    pub location: String,
    pub skills: Vec<String>,
    pub preferred_companies: Vec<String>,
    pub whatsapp_number: Option<String>,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub resume_filename: Option<String>,
    #[serde(skip)]
    pub resume_data: Option<Vec<u8>>,
    pub resume_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Preference {
    pub fn has_resume(&self) -> bool {
        self.resume_filename.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub data: Vec<u8>,
    pub text: String,
}

/// Full replacement of a user's preferences. `resume` is only applied when a
/// new document was uploaded; otherwise the stored one is kept.
#[derive(Debug, Clone)]
pub struct PreferenceUpdate {
    pub job_title: String,
    pub location: String,
    pub skills: Vec<String>,
    pub preferred_companies: Vec<String>,
    pub whatsapp_number: Option<String>,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub resume: Option<ResumeUpload>,
}
