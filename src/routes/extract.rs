use axum::extract::FromRequest;

use crate::error::Error;

/// `axum::Json` that reports body rejections as `Error::BadRequest`, so a
/// malformed payload gets the same JSON error body as any other 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);
