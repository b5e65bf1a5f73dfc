//! API endpoint handlers.

pub mod diagnose;
pub mod export;
pub mod extract;
pub mod health;
pub mod summarize;

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, OriginalUri, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;

/// `Json` body extractor whose rejections use the structured error body.
///
/// Missing fields, wrong types and malformed JSON all become
/// [`ApiError::BadRequest`]; bodies over the size cap become
/// [`ApiError::PayloadTooLarge`].
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(reject_json(rejection)),
        }
    }
}

fn reject_json(rejection: JsonRejection) -> ApiError {
    tracing::debug!(status = %rejection.status(), "Request body rejected");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(rejection.body_text())
    } else {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Run blocking work (model calls, PDF parsing, OCR) on the blocking pool.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Blocking task failed: {e}")))?
}

/// Fallback for unknown routes.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Reject empty or whitespace-only text fields.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}
