//! `POST /api/diagnose`: ranked candidate diagnoses.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{require_text, run_blocking, ApiJson};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::model_service::OperationKind;
use crate::pipeline::diagnosis::{
    DiagnosisClient, DiagnosisOutcome, DiagnosisResult, PatientInfo, RawDiagnosisOutput,
};
use crate::pipeline::preprocess::normalize_text;

#[derive(Deserialize)]
pub struct DiagnoseRequest {
    pub text: String,
    #[serde(default)]
    pub patient_info: Option<PatientInfo>,
}

#[derive(Serialize)]
pub struct DiagnoseResponse {
    pub model: String,
    pub diagnoses: Vec<DiagnosisResult>,
    /// Markdown rendering.
    pub diagnosis: String,
    pub raw: RawDiagnosisOutput,
}

pub async fn diagnose(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<DiagnoseRequest>,
) -> Result<Json<DiagnoseResponse>, ApiError> {
    require_text("text", &req.text)?;

    let outcome = run_blocking(move || {
        let _guard = ctx
            .model_service
            .acquire(OperationKind::Diagnosis, &ctx.models.diagnosis_model_id())?;

        let model = match ctx.models.diagnoser() {
            Ok(model) => model,
            Err(e) => return Ok(DiagnosisOutcome::failed(e)),
        };
        let text = normalize_text(&req.text);
        Ok(DiagnosisClient::new(model.as_ref()).generate_diagnosis(&text, req.patient_info.as_ref()))
    })
    .await?;

    match outcome {
        DiagnosisOutcome::Success(diagnosis) => Ok(Json(DiagnoseResponse {
            raw: diagnosis.raw_output(),
            model: diagnosis.model,
            diagnoses: diagnosis.diagnoses,
            diagnosis: diagnosis.diagnosis,
        })),
        DiagnosisOutcome::Failed { error } => Err(ApiError::ModelFailure(error)),
    }
}
