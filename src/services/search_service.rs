//! The search pipeline behind `/search-jobs`: merge criteria with stored
//! preferences, query the job source, normalize, persist, then notify.

use std::sync::Arc;
use std::time::Duration;

use crate::database::{ListingStore, PreferenceStore};
use crate::dto::job_dto::{JobSearchRequest, SearchCriteriaEcho};
use crate::error::Result;
use crate::models::job_posting::JobPosting;
use crate::models::preference::Preference;
use crate::models::user::User;
use crate::services::job_source::{JobSource, JobSourceError, RawJobResponse, SearchCriteria};
use crate::services::normalizer::{normalize, Normalized};
use crate::services::notifier::{build_digest, DeliveryOutcome, DigestContext, Notifier};
use crate::utils::{text, time};

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub postings: Vec<JobPosting>,
    pub criteria: SearchCriteriaEcho,
    /// `None` when no notification was attempted.
    pub notification: Option<DeliveryOutcome>,
}

impl SearchOutcome {
    pub fn total_jobs(&self) -> usize {
        self.postings.len()
    }

    pub fn notification_sent(&self) -> bool {
        self.notification
            .as_ref()
            .is_some_and(DeliveryOutcome::is_delivered)
    }
}

#[derive(Clone)]
pub struct JobSearchService {
    preferences: Arc<dyn PreferenceStore>,
    listings: Arc<dyn ListingStore>,
    source: Arc<dyn JobSource>,
    notifier: Notifier,
    source_timeout: Duration,
}

fn explicit_or_stored(explicit: Option<Vec<String>>, stored: Option<&Vec<String>>) -> Vec<String> {
    let explicit = text::dedup(
        explicit
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    );
    if explicit.is_empty() {
        stored.cloned().unwrap_or_default()
    } else {
        explicit
    }
}

/// Request fields win; empty lists fall back to the stored preferences.
pub fn merge_criteria(request: JobSearchRequest, stored: Option<&Preference>) -> SearchCriteria {
    SearchCriteria {
        job_title: request.job_title.trim().to_string(),
        location: request.location.trim().to_string(),
        skills: explicit_or_stored(request.skills, stored.map(|p| &p.skills)),
        preferred_companies: explicit_or_stored(
            request.preferred_companies,
            stored.map(|p| &p.preferred_companies),
        ),
        resume_context: stored
            .and_then(|p| p.resume_text.clone())
            .filter(|t| !t.trim().is_empty()),
    }
}

impl JobSearchService {
    pub fn new(
        preferences: Arc<dyn PreferenceStore>,
        listings: Arc<dyn ListingStore>,
        source: Arc<dyn JobSource>,
        notifier: Notifier,
        source_timeout: Duration,
    ) -> Self {
        Self {
            preferences,
            listings,
            source,
            notifier,
            source_timeout,
        }
    }

    /// Source failures and timeouts degrade to an empty result. Storage
    /// failures are returned to the caller.
    async fn fetch_raw(&self, criteria: &SearchCriteria) -> RawJobResponse {
        let result = match tokio::time::timeout(self.source_timeout, self.source.search(criteria)).await {
            Ok(result) => result,
            Err(_) => Err(JobSourceError::Timeout(self.source_timeout)),
        };
        result.unwrap_or_else(|e| {
            tracing::error!(error = %e, job_title = %criteria.job_title, "Job source failed");
            RawJobResponse::StructuredList(Vec::new())
        })
    }

    #[tracing::instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn search(&self, user: &User, request: JobSearchRequest) -> Result<SearchOutcome> {
        let stored = self.preferences.get(user.id).await?;
        let criteria = merge_criteria(request, stored.as_ref());

        let raw = self.fetch_raw(&criteria).await;
        let postings = match normalize(raw, time::today()) {
            Normalized::Postings(postings) => postings,
            unparseable @ Normalized::Unparseable(_) => {
                tracing::warn!("Job source response discarded, returning no results");
                unparseable.into_postings()
            }
        };

        let saved = if postings.is_empty() {
            Vec::new()
        } else {
            self.listings.append_batch(&postings).await?
        };
        tracing::info!(count = saved.len(), "Job search completed");

        let address = stored
            .as_ref()
            .and_then(|p| p.whatsapp_number.as_deref())
            .filter(|n| !n.trim().is_empty());
        let notification = match address {
            Some(address) if !saved.is_empty() => {
                let digest = build_digest(
                    &DigestContext {
                        recipient_name: &user.name,
                        job_title: &criteria.job_title,
                        location: &criteria.location,
                        total_jobs: saved.len(),
                    },
                    &saved,
                );
                Some(self.notifier.deliver(address, &digest.body).await)
            }
            _ => None,
        };

        Ok(SearchOutcome {
            postings: saved,
            criteria: SearchCriteriaEcho {
                resume_matching: criteria.resume_context.is_some(),
                job_title: criteria.job_title,
                location: criteria.location,
                skills_used: criteria.skills,
                companies_prioritized: criteria.preferred_companies,
            },
            notification,
        })
    }
}
