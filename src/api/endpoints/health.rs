//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::model_service::ActiveOperation;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub summary_model: String,
    pub diagnosis_model: String,
    pub ocr_available: bool,
    pub current_operation: Option<ActiveOperation>,
}

/// `GET /api/health`
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        summary_model: ctx.models.summary_model_id(),
        diagnosis_model: ctx.models.diagnosis_model_id(),
        ocr_available: ctx.ocr.is_some(),
        current_operation: ctx.model_service.current_operation(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ServiceConfig;
    use crate::model_service::OperationKind;
    use crate::pipeline::inference::MockModelFactory;

    #[tokio::test]
    async fn reports_running_operation() {
        let ctx = ApiContext::new(ServiceConfig::default())
            .with_models(Arc::new(MockModelFactory::failing()));

        let Json(idle) = check(State(ctx.clone())).await;
        assert!(idle.current_operation.is_none());

        let _guard = ctx
            .model_service
            .try_acquire(OperationKind::Diagnosis, "mock-diagnoser")
            .unwrap();
        let Json(busy) = check(State(ctx.clone())).await;
        let op = busy.current_operation.unwrap();
        assert_eq!(op.kind, OperationKind::Diagnosis);
        assert_eq!(op.model, "mock-diagnoser");
    }
}
