use std::sync::Arc;

use super::{HuggingFaceClient, InferenceError, OllamaClient};
use crate::config::{DiagnosisBackend, ServiceConfig, SummaryBackend};
use crate::pipeline::diagnosis::{
    ClassifierDiagnosisModel, DiagnosisModel, DiagnosisResult, GenerativeDiagnosisModel,
    MockDiagnosisModel,
};
use crate::pipeline::summarization::{
    HuggingFaceSummarizer, MockSummarizationModel, OllamaSummarizer, SummarizationModel,
};

/// Builds model clients on demand.
///
/// Called from blocking tasks: the blocking HTTP clients must not be
/// created or dropped on an async worker thread.
pub trait ModelFactory: Send + Sync {
    fn summarizer(&self) -> Result<Box<dyn SummarizationModel>, InferenceError>;

    fn diagnoser(&self) -> Result<Box<dyn DiagnosisModel>, InferenceError>;

    /// Identifier of the summarization model, without building a client.
    fn summary_model_id(&self) -> String;

    /// Identifier of the diagnosis model, without building a client.
    fn diagnosis_model_id(&self) -> String;
}

/// Factory driven by [`ServiceConfig`] backend selection.
pub struct ConfiguredModels {
    config: Arc<ServiceConfig>,
}

impl ConfiguredModels {
    pub fn new(config: Arc<ServiceConfig>) -> Self {
        Self { config }
    }
}

impl ModelFactory for ConfiguredModels {
    fn summarizer(&self) -> Result<Box<dyn SummarizationModel>, InferenceError> {
        let model = &self.config.summary_model;
        let summarizer: Box<dyn SummarizationModel> = match self.config.summary_backend {
            SummaryBackend::HuggingFace => Box::new(HuggingFaceSummarizer::new(
                HuggingFaceClient::from_config(&self.config)?,
                model,
            )),
            SummaryBackend::Ollama => Box::new(OllamaSummarizer::new(
                Box::new(OllamaClient::from_config(&self.config)?),
                model,
            )),
        };
        Ok(summarizer)
    }

    fn diagnoser(&self) -> Result<Box<dyn DiagnosisModel>, InferenceError> {
        let diagnoser: Box<dyn DiagnosisModel> = match self.config.diagnosis_backend {
            DiagnosisBackend::Classifier => Box::new(ClassifierDiagnosisModel::new(
                HuggingFaceClient::from_config(&self.config)?,
                &self.config.diagnosis_model,
            )),
            DiagnosisBackend::Generative => Box::new(GenerativeDiagnosisModel::new(
                Box::new(OllamaClient::from_config(&self.config)?),
                &self.config.generative_model,
            )),
        };
        Ok(diagnoser)
    }

    fn summary_model_id(&self) -> String {
        self.config.summary_model.clone()
    }

    fn diagnosis_model_id(&self) -> String {
        self.config.active_diagnosis_model().to_string()
    }
}

/// Factory handing out mock models; `None` means every call fails.
pub struct MockModelFactory {
    pub summary: Option<String>,
    pub diagnoses: Option<Vec<DiagnosisResult>>,
}

impl MockModelFactory {
    pub fn new(summary: &str, diagnoses: Vec<DiagnosisResult>) -> Self {
        Self {
            summary: Some(summary.to_string()),
            diagnoses: Some(diagnoses),
        }
    }

    pub fn failing() -> Self {
        Self {
            summary: None,
            diagnoses: None,
        }
    }
}

impl ModelFactory for MockModelFactory {
    fn summarizer(&self) -> Result<Box<dyn SummarizationModel>, InferenceError> {
        let model = match &self.summary {
            Some(summary) => MockSummarizationModel::fixed(summary),
            None => MockSummarizationModel::failing(),
        };
        Ok(Box::new(model))
    }

    fn diagnoser(&self) -> Result<Box<dyn DiagnosisModel>, InferenceError> {
        let model = match &self.diagnoses {
            Some(results) => MockDiagnosisModel::new(results.clone()),
            None => MockDiagnosisModel::failing(),
        };
        Ok(Box::new(model))
    }

    fn summary_model_id(&self) -> String {
        "mock-summarizer".to_string()
    }

    fn diagnosis_model_id(&self) -> String {
        "mock-diagnoser".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_default_backends_without_credentials() {
        let factory = ConfiguredModels::new(Arc::new(ServiceConfig::default()));
        let summarizer = factory.summarizer().unwrap();
        assert_eq!(summarizer.model_id(), "facebook/bart-large-cnn");
        let diagnoser = factory.diagnoser().unwrap();
        assert_eq!(
            diagnoser.model_id(),
            "DATEXIS/CORe-clinical-diagnosis-prediction"
        );
    }

    #[test]
    fn generative_backend_uses_generative_model() {
        let config = ServiceConfig {
            diagnosis_backend: DiagnosisBackend::Generative,
            summary_backend: SummaryBackend::Ollama,
            summary_model: "llama3".into(),
            ..ServiceConfig::default()
        };
        let factory = ConfiguredModels::new(Arc::new(config));
        assert_eq!(factory.diagnoser().unwrap().model_id(), "medgemma");
        assert_eq!(factory.diagnosis_model_id(), "medgemma");
        assert_eq!(factory.summarizer().unwrap().model_id(), "llama3");
    }

    #[test]
    fn failing_mock_factory_builds_failing_models() {
        let factory = MockModelFactory::failing();
        let summarizer = factory.summarizer().unwrap();
        assert!(summarizer
            .summarize("text", &crate::pipeline::summarization::GenerationParams::report())
            .is_err());
        assert!(factory.diagnoser().unwrap().diagnose("prompt").is_err());
    }
}
