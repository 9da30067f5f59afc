use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A stored posting. Rows are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub application_url: String,
    pub salary_range: String,
    pub job_type: String,
    pub experience_level: String,
    pub posted_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A normalized posting that has not been persisted yet. Every field is
/// populated, either with a value from the source or with its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub application_url: String,
    pub salary_range: String,
    pub job_type: String,
    pub experience_level: String,
    pub posted_date: NaiveDate,
}
