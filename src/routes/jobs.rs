use axum::{extract::State, response::IntoResponse, Extension, Json};
use validator::Validate;

use crate::dto::job_dto::{JobHistoryResponse, JobSearchRequest, JobSearchResponse};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

use super::extract::ApiJson;

pub const HISTORY_LIMIT: i64 = 50;

#[utoipa::path(
    post,
    path = "/search-jobs",
    request_body = JobSearchRequest,
    responses(
        (status = 200, description = "Search results, possibly empty", body = JobSearchResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Results could not be stored")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn search_jobs(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(payload): ApiJson<JobSearchRequest>,
) -> Result<impl IntoResponse> {
    let payload = payload.trimmed();
    payload.validate()?;
    let user = state.auth_service.current_user(claims.sub).await?;
    let outcome = state.search_service.search(&user, payload).await?;

    Ok(Json(JobSearchResponse {
        status: "success".into(),
        total_jobs: outcome.total_jobs(),
        notification_sent: outcome.notification_sent(),
        results: outcome.postings,
        search_criteria: outcome.criteria,
    }))
}

#[utoipa::path(
    get,
    path = "/job-history",
    responses(
        (status = 200, description = "Most recently stored postings", body = JobHistoryResponse),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn job_history(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let jobs = state.listings.recent(HISTORY_LIMIT).await?;
    Ok(Json(JobHistoryResponse {
        status: "success".into(),
        jobs,
    }))
}
