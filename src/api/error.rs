//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::model_service::ModelServiceError;
use crate::pipeline::extraction::ExtractionError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("No text extracted: {0}")]
    NoTextExtracted(String),
    #[error("Model failure: {0}")]
    ModelFailure(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::PayloadTooLarge(detail) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", detail)
            }
            ApiError::NoTextExtracted(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_TEXT_EXTRACTED",
                detail,
            ),
            ApiError::ModelFailure(detail) => {
                tracing::warn!(detail, "Model call failed");
                (StatusCode::BAD_GATEWAY, "MODEL_FAILURE", detail)
            }
            ApiError::Unavailable(detail) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UNAVAILABLE",
                detail,
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::NoTextExtracted(message) => ApiError::NoTextExtracted(message),
            ExtractionError::InvalidEncoding(_)
            | ExtractionError::UnsupportedFormat
            | ExtractionError::PdfParsing(_)
            | ExtractionError::ImageProcessing(_) => ApiError::BadRequest(err.to_string()),
            ExtractionError::OcrUnavailable
            | ExtractionError::TessdataNotFound(_)
            | ExtractionError::OcrInit(_) => ApiError::Unavailable(err.to_string()),
            ExtractionError::OcrProcessing(_) | ExtractionError::Io(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<ModelServiceError> for ApiError {
    fn from(err: ModelServiceError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400() {
        let response = ApiError::BadRequest("text must not be empty".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["message"], "text must not be empty");
    }

    #[tokio::test]
    async fn payload_too_large_returns_413() {
        let response = ApiError::PayloadTooLarge("length limit exceeded".into()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("No route for /api/x".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn no_text_returns_422() {
        let response = ApiError::NoTextExtracted("blank scan".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "NO_TEXT_EXTRACTED");
    }

    #[tokio::test]
    async fn model_failure_returns_502_with_reason() {
        let response = ApiError::ModelFailure("HF_API_TOKEN is not set".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "MODEL_FAILURE");
        assert_eq!(json["error"]["message"], "HF_API_TOKEN is not set");
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let response = ApiError::Internal("lock poisoned".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "An internal error occurred"
        );
    }

    #[test]
    fn extraction_errors_map_to_statuses() {
        assert!(matches!(
            ApiError::from(ExtractionError::NoTextExtracted("x".into())),
            ApiError::NoTextExtracted(_)
        ));
        assert!(matches!(
            ApiError::from(ExtractionError::PdfParsing("bad xref".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(ExtractionError::OcrUnavailable),
            ApiError::Unavailable(_)
        ));
    }
}
