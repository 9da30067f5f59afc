use axum::{extract::State, response::IntoResponse, Extension, Json};

use crate::dto::job_dto::{TestNotificationPayload, TestNotificationResponse};
use crate::dto::preference_dto::validate_phone;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::services::notifier::{DeliveryOutcome, TEST_MESSAGE};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/send-test-notification",
    request_body = TestNotificationPayload,
    responses(
        (status = 200, description = "Test message sent", body = TestNotificationResponse),
        (status = 400, description = "No phone number given or stored"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Gateway rejected the message")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn send_test_notification(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Option<Json<TestNotificationPayload>>,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.current_user(claims.sub).await?;
    let explicit = payload
        .and_then(|Json(p)| p.phone_number)
        .filter(|n| !n.trim().is_empty());

    let number = match explicit {
        Some(number) => number,
        None => state
            .preference_service
            .get(user.id)
            .await?
            .and_then(|p| p.whatsapp_number)
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                Error::BadRequest("No phone number provided or saved in preferences".into())
            })?,
    };
    validate_phone(&number)
        .map_err(|_| Error::BadRequest(format!("Invalid phone number: {}", number)))?;

    match state.notifier.deliver(&number, TEST_MESSAGE).await {
        DeliveryOutcome::Delivered { id } => Ok(Json(TestNotificationResponse {
            status: "success".into(),
            message: "Test notification sent successfully".into(),
            message_id: id,
        })),
        DeliveryOutcome::Failed { reason } => Err(Error::Internal(format!(
            "Failed to send notification: {}",
            reason
        ))),
    }
}
