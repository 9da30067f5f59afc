use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const RESUME_CONTEXT_CHARS: usize = 500;
pub const MAX_REQUESTED_JOBS: usize = 20;

/// Merged search parameters: explicit request fields plus stored preference
/// fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub job_title: String,
    pub location: String,
    pub skills: Vec<String>,
    pub preferred_companies: Vec<String>,
    pub resume_context: Option<String>,
}

/// What a job source hands back before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawJobResponse {
    StructuredList(Vec<JsonValue>),
    FreeText(String),
}

#[derive(Debug, thiserror::Error)]
pub enum JobSourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Job source returned no content")]
    EmptyContent,

    #[error("Job source timed out after {0:?}")]
    Timeout(Duration),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn search(&self, criteria: &SearchCriteria) -> Result<RawJobResponse, JobSourceError>;
}

pub fn build_search_prompt(criteria: &SearchCriteria) -> String {
    let mut parts = vec![format!(
        "Find up to {} job openings for '{}' in '{}'.",
        MAX_REQUESTED_JOBS, criteria.job_title, criteria.location
    )];

    if !criteria.skills.is_empty() {
        parts.push(format!(
            "Focus on jobs that require these skills: {}",
            criteria.skills.join(", ")
        ));
    }

    if !criteria.preferred_companies.is_empty() {
        parts.push(format!(
            "Prioritize these companies: {}",
            criteria.preferred_companies.join(", ")
        ));
    }

    if let Some(resume) = criteria.resume_context.as_deref() {
        let excerpt: String = resume.chars().take(RESUME_CONTEXT_CHARS).collect();
        parts.push(format!(
            "Match jobs based on this resume content: {}...",
            excerpt
        ));
    }

    parts.extend(
        [
            "Return results as a JSON array with these exact keys:",
            "- title: Job title",
            "- company: Company name",
            "- location: Job location",
            "- description: Brief job description (max 200 characters)",
            "- url: Direct application URL (not just company homepage)",
            "- application_url: Direct link to apply for the job",
            "- salary_range: Salary range if available",
            "- job_type: Full-time, Part-time, Contract, etc.",
            "- experience_level: Entry, Mid, Senior, etc.",
            "- posted_date: Date in YYYY-MM-DD format",
            "Ensure all URLs are direct application links, not just company homepages.",
            "If no direct application URL is available, use the job posting URL.",
        ]
        .map(String::from),
    );

    parts.join(" ")
}

#[derive(Clone)]
pub struct GeminiJobSource {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiJobSource {
    pub fn new(api_key: String, model: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl JobSource for GeminiJobSource {
    #[tracing::instrument(skip(self, criteria), fields(model = %self.model, job_title = %criteria.job_title))]
    async fn search(&self, criteria: &SearchCriteria) -> Result<RawJobResponse, JobSourceError> {
        let payload = serde_json::json!({
            "contents": [
                { "parts": [ { "text": build_search_prompt(criteria) } ] }
            ]
        });

        let res = self
            .client
            .post(format!("{}/{}:generateContent", GEMINI_API_BASE, self.model))
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let message = res.text().await.unwrap_or_default();
            return Err(JobSourceError::Api { status, message });
        }

        let body: JsonValue = res.json().await?;
        let text = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                    .collect::<String>()
            })
            .filter(|t| !t.trim().is_empty())
            .ok_or(JobSourceError::EmptyContent)?;

        tracing::debug!(response_len = text.len(), "Gemini response received");
        Ok(RawJobResponse::FreeText(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_only_present_criteria() {
        let criteria = SearchCriteria {
            job_title: "Data Scientist".into(),
            location: "Remote".into(),
            ..Default::default()
        };
        let prompt = build_search_prompt(&criteria);

        assert!(prompt.starts_with("Find up to 20 job openings for 'Data Scientist' in 'Remote'."));
        assert!(!prompt.contains("Focus on jobs"));
        assert!(!prompt.contains("Prioritize these companies"));
        assert!(!prompt.contains("resume content"));
        assert!(prompt.contains("- application_url: Direct link to apply for the job"));
    }

    #[test]
    fn prompt_lists_skills_companies_and_resume_excerpt() {
        let criteria = SearchCriteria {
            job_title: "Engineer".into(),
            location: "Berlin".into(),
            skills: vec!["rust".into(), "sql".into()],
            preferred_companies: vec!["Stripe".into()],
            resume_context: Some("x".repeat(800)),
        };
        let prompt = build_search_prompt(&criteria);

        assert!(prompt.contains("Focus on jobs that require these skills: rust, sql"));
        assert!(prompt.contains("Prioritize these companies: Stripe"));
        let excerpt = format!("resume content: {}...", "x".repeat(500));
        assert!(prompt.contains(&excerpt));
        assert!(!prompt.contains(&"x".repeat(501)));
    }
}
