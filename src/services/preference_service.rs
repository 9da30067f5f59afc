use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::database::PreferenceStore;
use crate::dto::preference_dto::{validate_phone, PreferenceForm, ResumeFile};
use crate::error::{Error, Result};
use crate::models::preference::{Preference, PreferenceUpdate, ResumeUpload};
use crate::services::document_service::{extract_text, DocumentFormat};

#[derive(Clone)]
pub struct PreferenceService {
    store: Arc<dyn PreferenceStore>,
}

impl PreferenceService {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<Preference>> {
        self.store.get(user_id).await
    }

    /// Replaces the user's stored preferences. A failed resume extraction
    /// aborts the save before anything is written.
    pub async fn save(
        &self,
        user_id: Uuid,
        form: PreferenceForm,
        resume: Option<ResumeFile>,
    ) -> Result<Preference> {
        form.validate()?;
        if let Some(number) = form.whatsapp_number.as_deref() {
            validate_phone(number)
                .map_err(|_| Error::BadRequest(format!("Invalid WhatsApp number: {}", number)))?;
        }

        let resume = match resume {
            Some(file) => {
                let format = DocumentFormat::detect(file.content_type.as_deref(), &file.filename)?;
                let text = extract_text(file.data.clone(), format).await?;
                tracing::info!(
                    user_id = %user_id,
                    filename = %file.filename,
                    chars = text.chars().count(),
                    "Resume parsed"
                );
                Some(ResumeUpload {
                    filename: file.filename,
                    data: file.data,
                    text,
                })
            }
            None => None,
        };

        let update = PreferenceUpdate {
            job_title: form.job_title.trim().to_string(),
            location: form.location.trim().to_string(),
            skills: form.skills,
            preferred_companies: form.preferred_companies,
            whatsapp_number: form.whatsapp_number,
            linkedin_url: form.linkedin_url,
            email: form.email,
            resume,
        };

        self.store.upsert(user_id, update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    fn form() -> PreferenceForm {
        PreferenceForm {
            job_title: "Data Scientist".into(),
            location: "Remote".into(),
            skills: vec!["python".into(), "sql".into()],
            preferred_companies: vec!["Stripe".into()],
            whatsapp_number: Some("+15550001111".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn saving_twice_keeps_one_row_with_latest_values() {
        let store = Arc::new(MemoryStore::new());
        let service = PreferenceService::new(store.clone());
        let user_id = Uuid::new_v4();

        service.save(user_id, form(), None).await.unwrap();
        let mut second = form();
        second.location = "Berlin".into();
        let saved = service.save(user_id, second, None).await.unwrap();

        assert_eq!(saved.location, "Berlin");
        assert_eq!(store.preference_count().await, 1);
        assert_eq!(service.get(user_id).await.unwrap().unwrap().location, "Berlin");
    }

    #[tokio::test]
    async fn unsupported_resume_is_rejected_and_nothing_is_stored() {
        let store = Arc::new(MemoryStore::new());
        let service = PreferenceService::new(store.clone());
        let resume = ResumeFile {
            filename: "resume.txt".into(),
            content_type: Some("text/plain".into()),
            data: b"plain text".to_vec(),
        };

        let err = service
            .save(Uuid::new_v4(), form(), Some(resume))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
        assert_eq!(store.preference_count().await, 0);
    }

    #[tokio::test]
    async fn blank_title_fails_validation() {
        let service = PreferenceService::new(Arc::new(MemoryStore::new()));
        let mut bad = form();
        bad.job_title = String::new();
        let err = service.save(Uuid::new_v4(), bad, None).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn malformed_phone_fails_validation() {
        let service = PreferenceService::new(Arc::new(MemoryStore::new()));
        let mut bad = form();
        bad.whatsapp_number = Some("not a number".into());
        let err = service.save(Uuid::new_v4(), bad, None).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }
}
