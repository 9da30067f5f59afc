use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::IntoResponse,
    Extension, Json,
};

use crate::dto::preference_dto::{
    PreferenceForm, PreferenceView, PreferencesResponse, ResumeFile, SavePreferencesResponse,
};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::utils::text::split_list;
use crate::AppState;

fn non_blank(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Decodes the preference form. A file part without a filename or without
/// content counts as "no resume".
async fn read_form(mut multipart: Multipart) -> Result<(PreferenceForm, Option<ResumeFile>)> {
    let mut form = PreferenceForm::default();
    let mut resume = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let filename = field.file_name().map(str::to_string).unwrap_or_default();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                if !filename.is_empty() && !data.is_empty() {
                    resume = Some(ResumeFile {
                        filename,
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            "job_title" => form.job_title = field.text().await?.trim().to_string(),
            "location" => form.location = field.text().await?.trim().to_string(),
            "skills" => form.skills = split_list(&field.text().await?),
            "preferred_companies" => form.preferred_companies = split_list(&field.text().await?),
            "whatsapp_number" => form.whatsapp_number = non_blank(field.text().await?),
            "linkedin_url" => form.linkedin_url = non_blank(field.text().await?),
            "email" => form.email = non_blank(field.text().await?),
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    if form.job_title.is_empty() || form.location.is_empty() {
        return Err(Error::BadRequest("job_title and location are required".into()));
    }

    Ok((form, resume))
}

#[utoipa::path(
    post,
    path = "/save-preferences",
    responses(
        (status = 200, description = "Preferences saved", body = SavePreferencesResponse),
        (status = 400, description = "Invalid form or unsupported resume"),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn save_preferences(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.current_user(claims.sub).await?;
    let (form, resume) = read_form(multipart?).await?;
    let saved = state.preference_service.save(user.id, form, resume).await?;

    Ok(Json(SavePreferencesResponse {
        status: "success".into(),
        message: "Preferences saved successfully".into(),
        resume_parsed: saved.has_resume(),
        skills_extracted: saved.skills,
    }))
}

#[utoipa::path(
    get,
    path = "/user-preferences",
    responses(
        (status = 200, description = "Stored preferences, or null", body = PreferencesResponse),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.current_user(claims.sub).await?;
    let preferences = state.preference_service.get(user.id).await?;
    Ok(Json(PreferencesResponse {
        status: "success".into(),
        preferences: preferences.map(PreferenceView::from),
    }))
}
