use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::dto::{auth_dto, job_dto, preference_dto};
use crate::models::job_posting::JobPosting;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::health::root,
        super::health::health,
        super::auth::signup,
        super::auth::login,
        super::preferences::save_preferences,
        super::preferences::get_preferences,
        super::jobs::search_jobs,
        super::jobs::job_history,
        super::notifications::send_test_notification,
    ),
    components(schemas(
        auth_dto::SignupPayload,
        auth_dto::LoginPayload,
        auth_dto::UserSummary,
        auth_dto::SignupResponse,
        auth_dto::LoginResponse,
        preference_dto::SavePreferencesResponse,
        preference_dto::PreferenceView,
        preference_dto::PreferencesResponse,
        job_dto::JobSearchRequest,
        job_dto::SearchCriteriaEcho,
        job_dto::JobSearchResponse,
        job_dto::JobHistoryResponse,
        job_dto::TestNotificationPayload,
        job_dto::TestNotificationResponse,
        JobPosting,
    )),
    modifiers(&BearerAuth),
    tags((name = "job-agent", description = "Job search and alert API"))
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
