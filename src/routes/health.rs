use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
#[axum::debug_handler]
pub async fn health() -> impl IntoResponse {
    let body = json!({
        "status": "ok",
    });
    (StatusCode::OK, Json(body))
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner"))
)]
#[axum::debug_handler]
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "Job Agent API",
        "version": env!("CARGO_PKG_VERSION"),
        "features": [
            "User authentication",
            "Resume parsing (PDF/DOCX)",
            "Job search with preferred companies",
            "WhatsApp notifications",
            "Job history",
        ],
    }))
}
