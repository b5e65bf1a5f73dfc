//! `POST /api/summarize`: whole-report or per-section summaries.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{require_text, run_blocking, ApiJson};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::model_service::OperationKind;
use crate::pipeline::preprocess::{normalize_text, SectionName};
use crate::pipeline::summarization::{SummarizationClient, SummaryOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    #[default]
    Full,
    Sections,
}

#[derive(Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    #[serde(default)]
    pub mode: SummaryMode,
}

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub mode: SummaryMode,
    /// Chunks summarized in full mode, non-empty sections otherwise.
    pub model_calls: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<BTreeMap<SectionName, String>>,
}

fn summary_text(outcome: SummaryOutcome) -> Result<String, ApiError> {
    match outcome {
        SummaryOutcome::Generated { summary } => Ok(summary),
        SummaryOutcome::Failed { reason } => Err(ApiError::ModelFailure(reason)),
    }
}

pub async fn summarize(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    require_text("text", &req.text)?;

    let response = run_blocking(move || {
        let kind = match req.mode {
            SummaryMode::Full => OperationKind::ReportSummarization,
            SummaryMode::Sections => OperationKind::SectionSummarization,
        };
        let _guard = ctx
            .model_service
            .acquire(kind, &ctx.models.summary_model_id())?;

        let model = ctx
            .models
            .summarizer()
            .map_err(|e| ApiError::ModelFailure(e.to_string()))?;
        let client = SummarizationClient::from_config(model.as_ref(), &ctx.config);

        match req.mode {
            SummaryMode::Full => {
                let result = client.summarize_report(&normalize_text(&req.text));
                Ok(SummarizeResponse {
                    summary: summary_text(result.outcome)?,
                    mode: SummaryMode::Full,
                    model_calls: result.chunk_count,
                    sections: None,
                })
            }
            SummaryMode::Sections => {
                let result = client.summarize_report_sections(&req.text);
                Ok(SummarizeResponse {
                    summary: summary_text(result.outcome)?,
                    mode: SummaryMode::Sections,
                    model_calls: result.section_count,
                    sections: Some(result.sections),
                })
            }
        }
    })
    .await?;

    Ok(Json(response))
}
