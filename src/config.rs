use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSourceKind {
    Gemini,
    Synthetic,
}

#[derive(Debug, Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub whatsapp_from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    pub job_source: JobSourceKind,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub job_source_timeout_secs: u64,
    pub twilio: Option<TwilioCredentials>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let storage_backend = match optional_env("STORAGE_BACKEND").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(Error::Config(format!(
                    "Invalid value for STORAGE_BACKEND: {}",
                    other
                )))
            }
        };

        let database_url = optional_env("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(Error::Config(
                "Missing environment variable: DATABASE_URL".to_string(),
            ));
        }

        let gemini_api_key = optional_env("GEMINI_API_KEY");
        let job_source = match optional_env("JOB_SOURCE").as_deref() {
            Some("gemini") => JobSourceKind::Gemini,
            Some("synthetic") => JobSourceKind::Synthetic,
            None if gemini_api_key.is_some() => JobSourceKind::Gemini,
            None => JobSourceKind::Synthetic,
            Some(other) => {
                return Err(Error::Config(format!(
                    "Invalid value for JOB_SOURCE: {}",
                    other
                )))
            }
        };
        if job_source == JobSourceKind::Gemini && gemini_api_key.is_none() {
            return Err(Error::Config(
                "JOB_SOURCE=gemini requires GEMINI_API_KEY".to_string(),
            ));
        }

        let twilio = match (
            optional_env("TWILIO_ACCOUNT_SID"),
            optional_env("TWILIO_AUTH_TOKEN"),
            optional_env("TWILIO_WHATSAPP_FROM"),
        ) {
            (Some(account_sid), Some(auth_token), Some(whatsapp_from)) => {
                Some(TwilioCredentials {
                    account_sid,
                    auth_token,
                    whatsapp_from,
                })
            }
            _ => None,
        };

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            storage_backend,
            database_url,
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_expiry_minutes: get_env_parse_or("JWT_EXPIRY_MINUTES", 30)?,
            job_source,
            gemini_api_key,
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| "gemini-2.5-flash".to_string()),
            job_source_timeout_secs: get_env_parse_or("JOB_SOURCE_TIMEOUT_SECS", 60)?,
            twilio,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
