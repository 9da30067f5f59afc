use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::dto::auth_dto::{LoginPayload, LoginResponse, SignupPayload, SignupResponse};
use crate::{error::Result, AppState};

use super::extract::ApiJson;

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupPayload,
    responses(
        (status = 200, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid payload or email already registered")
    )
)]
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.auth_service.register(payload).await?;
    Ok(Json(SignupResponse {
        status: "success".into(),
        message: "User created successfully".into(),
        user: user.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Bearer token issued", body = LoginResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (access_token, user) = state.auth_service.login(payload).await?;
    Ok(Json(LoginResponse {
        status: "success".into(),
        access_token,
        token_type: "bearer".into(),
        user: user.into(),
    }))
}
