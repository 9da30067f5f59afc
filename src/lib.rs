pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::config::{Config, JobSourceKind, StorageBackend};
use crate::database::{
    memory::MemoryStore, pool, postgres::PgStore, ListingStore, PreferenceStore, UserStore,
};
use crate::error::{Error, Result};
use crate::services::{
    auth_service::AuthService,
    job_source::{GeminiJobSource, JobSource},
    notifier::{LogGateway, NotificationGateway, Notifier, TwilioGateway},
    preference_service::PreferenceService,
    search_service::JobSearchService,
    synthetic_source::SyntheticJobSource,
};
use crate::utils::token::JwtKeys;

pub use crate::routes::build_router;

#[derive(Clone)]
pub struct AppState {
    pub listings: Arc<dyn ListingStore>,
    pub jwt: JwtKeys,
    pub auth_service: AuthService,
    pub preference_service: PreferenceService,
    pub search_service: JobSearchService,
    pub notifier: Notifier,
}

/// One backing store seen through the three storage seams.
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub listings: Arc<dyn ListingStore>,
}

impl Stores {
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: UserStore + PreferenceStore + ListingStore + 'static,
    {
        Self {
            users: store.clone(),
            preferences: store.clone(),
            listings: store,
        }
    }
}

impl AppState {
    pub fn new(
        stores: Stores,
        source: Arc<dyn JobSource>,
        gateway: Arc<dyn NotificationGateway>,
        jwt: JwtKeys,
        source_timeout: Duration,
    ) -> Self {
        let notifier = Notifier::new(gateway);
        let search_service = JobSearchService::new(
            stores.preferences.clone(),
            stores.listings.clone(),
            source,
            notifier.clone(),
            source_timeout,
        );

        Self {
            listings: stores.listings,
            auth_service: AuthService::new(stores.users, jwt.clone()),
            preference_service: PreferenceService::new(stores.preferences),
            search_service,
            notifier,
            jwt,
        }
    }

    /// Wires concrete collaborators from configuration. Connects to and
    /// migrates Postgres when that backend is selected.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.job_source_timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let stores = match config.storage_backend {
            StorageBackend::Postgres => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    Error::Config("Missing environment variable: DATABASE_URL".into())
                })?;
                let pool = pool::create_pool(url).await?;
                pool::run_migrations(&pool).await?;
                Stores::shared(Arc::new(PgStore::new(pool)))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Stores::shared(Arc::new(MemoryStore::new()))
            }
        };

        let source: Arc<dyn JobSource> = match config.job_source {
            JobSourceKind::Gemini => {
                let api_key = config.gemini_api_key.clone().ok_or_else(|| {
                    Error::Config("JOB_SOURCE=gemini requires GEMINI_API_KEY".into())
                })?;
                Arc::new(GeminiJobSource::new(
                    api_key,
                    config.gemini_model.clone(),
                    http_client.clone(),
                ))
            }
            JobSourceKind::Synthetic => {
                tracing::info!("Using synthetic job source");
                Arc::new(SyntheticJobSource::new())
            }
        };

        let gateway: Arc<dyn NotificationGateway> = match &config.twilio {
            Some(credentials) => Arc::new(TwilioGateway::new(credentials.clone(), http_client)),
            None => {
                tracing::warn!("Twilio credentials not set; notifications will only be logged");
                Arc::new(LogGateway)
            }
        };

        Ok(Self::new(
            stores,
            source,
            gateway,
            JwtKeys::new(&config.jwt_secret, config.jwt_expiry_minutes),
            Duration::from_secs(config.job_source_timeout_secs),
        ))
    }
}
