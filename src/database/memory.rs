use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ListingStore, PreferenceStore, UserStore};
use crate::error::{Error, Result};
use crate::models::job_posting::{JobPosting, NewJobPosting};
use crate::models::preference::{Preference, PreferenceUpdate};
use crate::models::user::{NewUser, User};

/// In-process store with the same contracts as `PgStore`. Used for
/// `STORAGE_BACKEND=memory` and to give each test its own isolated state.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    preferences: RwLock<HashMap<Uuid, Preference>>,
    listings: RwLock<Vec<JobPosting>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn preference_count(&self) -> usize {
        self.preferences.read().await.len()
    }

    pub async fn listing_count(&self) -> usize {
        self.listings.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(Error::Conflict("Email already registered".to_string()));
        }
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            linkedin_url: user.linkedin_url,
            created_at: Utc::now(),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<Preference>> {
        Ok(self.preferences.read().await.get(&user_id).cloned())
    }

    async fn upsert(&self, user_id: Uuid, update: PreferenceUpdate) -> Result<Preference> {
        let mut preferences = self.preferences.write().await;
        let now = Utc::now();

        let pref = match preferences.remove(&user_id) {
            Some(mut existing) => {
                existing.job_title = update.job_title;
                existing.location = update.location;
                existing.skills = update.skills;
                existing.preferred_companies = update.preferred_companies;
                existing.whatsapp_number = update.whatsapp_number;
                existing.linkedin_url = update.linkedin_url;
                existing.email = update.email;
                if let Some(resume) = update.resume {
                    existing.resume_filename = Some(resume.filename);
                    existing.resume_data = Some(resume.data);
                    existing.resume_text = Some(resume.text);
                }
                existing.updated_at = now;
                existing
            }
            None => {
                let (resume_filename, resume_data, resume_text) = match update.resume {
                    Some(r) => (Some(r.filename), Some(r.data), Some(r.text)),
                    None => (None, None, None),
                };
                Preference {
                    user_id,
                    job_title: update.job_title,
                    location: update.location,
                    skills: update.skills,
                    preferred_companies: update.preferred_companies,
                    whatsapp_number: update.whatsapp_number,
                    linkedin_url: update.linkedin_url,
                    email: update.email,
                    resume_filename,
                    resume_data,
                    resume_text,
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        preferences.insert(user_id, pref.clone());
        Ok(pref)
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn append_batch(&self, postings: &[NewJobPosting]) -> Result<Vec<JobPosting>> {
        let mut listings = self.listings.write().await;
        let created_at = Utc::now();
        let first_id = listings.last().map(|l| l.id + 1).unwrap_or(1);

        let stored: Vec<JobPosting> = postings
            .iter()
            .enumerate()
            .map(|(idx, p)| JobPosting {
                id: first_id + idx as i64,
                title: p.title.clone(),
                company: p.company.clone(),
                location: p.location.clone(),
                description: p.description.clone(),
                url: p.url.clone(),
                application_url: p.application_url.clone(),
                salary_range: p.salary_range.clone(),
                job_type: p.job_type.clone(),
                experience_level: p.experience_level.clone(),
                posted_date: p.posted_date,
                created_at,
            })
            .collect();

        listings.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<JobPosting>> {
        let listings = self.listings.read().await;
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(listings.iter().rev().take(limit).cloned().collect())
    }
}
