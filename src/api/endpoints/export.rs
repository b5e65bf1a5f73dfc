//! `POST /api/export`: download a summary or diagnosis as a text file.

use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;

use super::{require_text, ApiJson};
use crate::api::error::ApiError;
use crate::export::ExportKind;

#[derive(Deserialize)]
pub struct ExportRequest {
    pub kind: ExportKind,
    pub content: String,
}

pub async fn export(
    ApiJson(req): ApiJson<ExportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_text("content", &req.content)?;

    let disposition = format!("attachment; filename=\"{}\"", req.kind.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        req.content,
    ))
}
