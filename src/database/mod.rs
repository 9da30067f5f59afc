//! Persistence seams. Handlers and services only see these traits; the
//! concrete store is chosen at startup (`PgStore` or `MemoryStore`).

pub mod memory;
pub mod pool;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::job_posting::{JobPosting, NewJobPosting};
use crate::models::preference::{Preference, PreferenceUpdate};
use crate::models::user::{NewUser, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Error::Conflict` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<Option<Preference>>;
    /// Inserts the user's preference row or overwrites it in place.
    async fn upsert(&self, user_id: Uuid, update: PreferenceUpdate) -> Result<Preference>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Appends all postings or none of them.
    async fn append_batch(&self, postings: &[NewJobPosting]) -> Result<Vec<JobPosting>>;
    /// Newest first.
    async fn recent(&self, limit: i64) -> Result<Vec<JobPosting>>;
}
