use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ListingStore, PreferenceStore, UserStore};
use crate::error::{Error, Result};
use crate::models::job_posting::{JobPosting, NewJobPosting};
use crate::models::preference::{Preference, PreferenceUpdate};
use crate::models::user::{NewUser, User};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, linkedin_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.linkedin_url)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(Error::Conflict("Email already registered".to_string()))
            }
            Err(other) => Err(other.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE email = $1"#)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl PreferenceStore for PgStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<Preference>> {
        let pref = sqlx::query_as::<_, Preference>(
            r#"SELECT * FROM user_preferences WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(pref)
    }

    async fn upsert(&self, user_id: Uuid, update: PreferenceUpdate) -> Result<Preference> {
        let (resume_filename, resume_data, resume_text) = match update.resume {
            Some(resume) => (Some(resume.filename), Some(resume.data), Some(resume.text)),
            None => (None, None, None),
        };

        let pref = sqlx::query_as::<_, Preference>(
            r#"
            INSERT INTO user_preferences (
                user_id, job_title, location, skills, preferred_companies,
                whatsapp_number, linkedin_url, email,
                resume_filename, resume_data, resume_text
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id) DO UPDATE SET
                job_title = EXCLUDED.job_title,
                location = EXCLUDED.location,
                skills = EXCLUDED.skills,
                preferred_companies = EXCLUDED.preferred_companies,
                whatsapp_number = EXCLUDED.whatsapp_number,
                linkedin_url = EXCLUDED.linkedin_url,
                email = EXCLUDED.email,
                resume_filename = COALESCE(EXCLUDED.resume_filename, user_preferences.resume_filename),
                resume_data = CASE WHEN EXCLUDED.resume_filename IS NULL
                    THEN user_preferences.resume_data ELSE EXCLUDED.resume_data END,
                resume_text = CASE WHEN EXCLUDED.resume_filename IS NULL
                    THEN user_preferences.resume_text ELSE EXCLUDED.resume_text END,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&update.job_title)
        .bind(&update.location)
        .bind(&update.skills)
        .bind(&update.preferred_companies)
        .bind(&update.whatsapp_number)
        .bind(&update.linkedin_url)
        .bind(&update.email)
        .bind(resume_filename)
        .bind(resume_data)
        .bind(resume_text)
        .fetch_one(&self.pool)
        .await?;

        Ok(pref)
    }
}

#[async_trait]
impl ListingStore for PgStore {
    async fn append_batch(&self, postings: &[NewJobPosting]) -> Result<Vec<JobPosting>> {
        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(postings.len());

        for posting in postings {
            let row = sqlx::query_as::<_, JobPosting>(
                r#"
                INSERT INTO job_listings (
                    title, company, location, description, url, application_url,
                    salary_range, job_type, experience_level, posted_date
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
                "#,
            )
            .bind(&posting.title)
            .bind(&posting.company)
            .bind(&posting.location)
            .bind(&posting.description)
            .bind(&posting.url)
            .bind(&posting.application_url)
            .bind(&posting.salary_range)
            .bind(&posting.job_type)
            .bind(&posting.experience_level)
            .bind(posting.posted_date)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(row);
        }

        tx.commit().await?;
        Ok(stored)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<JobPosting>> {
        let rows = sqlx::query_as::<_, JobPosting>(
            r#"
            SELECT * FROM job_listings
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
