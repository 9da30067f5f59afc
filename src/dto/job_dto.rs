use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::job_posting::JobPosting;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct JobSearchRequest {
    #[validate(length(min = 1, max = 100))]
    pub job_title: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub preferred_companies: Option<Vec<String>>,
}

impl JobSearchRequest {
    /// Trims the free-text fields so whitespace-only values fail the length
    /// checks.
    pub fn trimmed(mut self) -> Self {
        self.job_title = self.job_title.trim().to_string();
        self.location = self.location.trim().to_string();
        self
    }
}

/// Effective criteria echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchCriteriaEcho {
    pub job_title: String,
    pub location: String,
    pub skills_used: Vec<String>,
    pub companies_prioritized: Vec<String>,
    pub resume_matching: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobSearchResponse {
    pub status: String,
    pub results: Vec<JobPosting>,
    pub total_jobs: usize,
    pub search_criteria: SearchCriteriaEcho,
    pub notification_sent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobHistoryResponse {
    pub status: String,
    pub jobs: Vec<JobPosting>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TestNotificationPayload {
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestNotificationResponse {
    pub status: String,
    pub message: String,
    pub message_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_title_or_location_is_invalid() {
        let blank_title = JobSearchRequest {
            job_title: "   ".into(),
            location: "Remote".into(),
            ..Default::default()
        };
        assert!(blank_title.clone().validate().is_ok());
        assert!(blank_title.trimmed().validate().is_err());

        let blank_location = JobSearchRequest {
            job_title: "Engineer".into(),
            location: "\t ".into(),
            ..Default::default()
        };
        assert!(blank_location.trimmed().validate().is_err());

        let padded = JobSearchRequest {
            job_title: "  Engineer ".into(),
            location: " Remote".into(),
            ..Default::default()
        }
        .trimmed();
        assert!(padded.validate().is_ok());
        assert_eq!(padded.job_title, "Engineer");
        assert_eq!(padded.location, "Remote");
    }
}
