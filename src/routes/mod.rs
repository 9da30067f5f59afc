pub mod auth;
pub mod docs;
pub mod extract;
pub mod health;
pub mod jobs;
pub mod notifications;
pub mod preferences;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::auth::require_bearer_auth;
use crate::AppState;

/// Resume uploads are capped separately at 10 MiB; this leaves room for the
/// rest of the multipart body.
pub const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/api-docs/openapi.json", get(docs::openapi_json));

    let protected = Router::new()
        .route("/save-preferences", post(preferences::save_preferences))
        .route("/user-preferences", get(preferences::get_preferences))
        .route("/search-jobs", post(jobs::search_jobs))
        .route("/job-history", get(jobs::job_history))
        .route(
            "/send-test-notification",
            post(notifications::send_test_notification),
        )
        .layer(from_fn_with_state(state.jwt.clone(), require_bearer_auth));

    public
        .merge(protected)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
