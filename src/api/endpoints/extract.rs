//! Text extraction endpoints for uploaded PDFs and images.
//!
//! - `POST /api/extract/pdf`: `{pdf_base64}` → `{text, page_count}`
//! - `POST /api/extract/image`: `{image_base64}` → `{text, message}`
//!
//! Payloads may be raw base64 or `data:` URLs.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{require_text, run_blocking, ApiJson};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::extraction::{decode_base64_payload, extract_report_text, ReportSource};

#[derive(Deserialize)]
pub struct PdfExtractRequest {
    pub pdf_base64: String,
}

#[derive(Serialize)]
pub struct PdfExtractResponse {
    pub text: String,
    pub page_count: usize,
}

#[derive(Deserialize)]
pub struct ImageExtractRequest {
    pub image_base64: String,
}

#[derive(Serialize)]
pub struct ImageExtractResponse {
    pub text: String,
    pub message: String,
}

pub async fn pdf(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<PdfExtractRequest>,
) -> Result<Json<PdfExtractResponse>, ApiError> {
    require_text("pdf_base64", &req.pdf_base64)?;
    let bytes = decode_base64_payload(&req.pdf_base64)?;

    let report = run_blocking(move || {
        let source = ReportSource::Pdf(bytes);
        Ok(extract_report_text(&source, ctx.pdf.as_ref(), None)?)
    })
    .await?;

    Ok(Json(PdfExtractResponse {
        page_count: report.page_count.unwrap_or_default(),
        text: report.text,
    }))
}

pub async fn image(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<ImageExtractRequest>,
) -> Result<Json<ImageExtractResponse>, ApiError> {
    require_text("image_base64", &req.image_base64)?;
    let bytes = decode_base64_payload(&req.image_base64)?;

    let report = run_blocking(move || {
        let source = ReportSource::Image(bytes);
        Ok(extract_report_text(&source, ctx.pdf.as_ref(), ctx.ocr.as_deref())?)
    })
    .await?;

    Ok(Json(ImageExtractResponse {
        text: report.text,
        message: report.message.unwrap_or_default(),
    }))
}
