pub mod auth_service;
pub mod document_service;
pub mod job_source;
pub mod normalizer;
pub mod notifier;
pub mod preference_service;
pub mod search_service;
pub mod synthetic_source;
