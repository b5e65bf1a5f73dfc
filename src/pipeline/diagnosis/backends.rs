use std::sync::Mutex;

use super::format::parse_generative_diagnoses;
use super::prompt::GENERATIVE_SYSTEM_PROMPT;
use super::types::{DiagnosisModel, DiagnosisResult};
use crate::pipeline::inference::{GenerateOptions, HuggingFaceClient, InferenceError, LlmClient};

/// Number of ranked labels requested from classifiers.
pub const CLASSIFIER_TOP_K: usize = 5;

/// Multi-label clinical classifier on the Hugging Face Inference API.
pub struct ClassifierDiagnosisModel {
    client: HuggingFaceClient,
    model: String,
}

impl ClassifierDiagnosisModel {
    pub fn new(client: HuggingFaceClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

impl DiagnosisModel for ClassifierDiagnosisModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn diagnose(&self, prompt: &str) -> Result<Vec<DiagnosisResult>, InferenceError> {
        let labels = self.client.classify(&self.model, prompt, CLASSIFIER_TOP_K)?;
        Ok(labels
            .into_iter()
            .map(|l| DiagnosisResult::scored(&l.label, l.score))
            .collect())
    }
}

/// Generative model asked for a numbered differential.
pub struct GenerativeDiagnosisModel {
    client: Box<dyn LlmClient>,
    model: String,
}

impl GenerativeDiagnosisModel {
    pub fn new(client: Box<dyn LlmClient>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

impl DiagnosisModel for GenerativeDiagnosisModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn diagnose(&self, prompt: &str) -> Result<Vec<DiagnosisResult>, InferenceError> {
        if !self.client.is_model_available(&self.model)? {
            return Err(InferenceError::ModelUnavailable(self.model.clone()));
        }
        let reply = self.client.generate(
            &self.model,
            prompt,
            GENERATIVE_SYSTEM_PROMPT,
            &GenerateOptions::default(),
        )?;
        let mut results = parse_generative_diagnoses(&reply);
        results.truncate(CLASSIFIER_TOP_K);
        Ok(results)
    }
}

/// Test double returning canned results and recording prompts.
pub struct MockDiagnosisModel {
    results: Option<Vec<DiagnosisResult>>,
    prompts: Mutex<Vec<String>>,
}

impl MockDiagnosisModel {
    pub fn new(results: Vec<DiagnosisResult>) -> Self {
        Self {
            results: Some(results),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with a service error.
    pub fn failing() -> Self {
        Self {
            results: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl DiagnosisModel for MockDiagnosisModel {
    fn model_id(&self) -> &str {
        "mock-diagnoser"
    }

    fn diagnose(&self, prompt: &str) -> Result<Vec<DiagnosisResult>, InferenceError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.results.clone().ok_or(InferenceError::Service {
            status: 503,
            body: "mock model offline".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::inference::MockLlmClient;

    #[test]
    fn generative_model_parses_reply() {
        let llm = MockLlmClient::new(
            "1. Acute myocardial infarction: ST elevation\n2. Unstable angina: pain at rest",
        );
        let model = GenerativeDiagnosisModel::new(Box::new(llm), "medgemma");
        let results = model.diagnose("chest pain").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].label, "Acute myocardial infarction");
        assert_eq!(results[1].reasoning.as_deref(), Some("pain at rest"));
    }

    #[test]
    fn generative_model_caps_entries() {
        let reply = (1..=8)
            .map(|i| format!("{i}. Condition {i}: reason"))
            .collect::<Vec<_>>()
            .join("\n");
        let model = GenerativeDiagnosisModel::new(Box::new(MockLlmClient::new(&reply)), "medgemma");
        assert_eq!(model.diagnose("notes").unwrap().len(), CLASSIFIER_TOP_K);
    }

    #[test]
    fn generative_model_requires_pulled_model() {
        let llm = MockLlmClient::new("1. X").with_models(vec!["llama3:8b".into()]);
        let model = GenerativeDiagnosisModel::new(Box::new(llm), "medgemma");
        let err = model.diagnose("notes").unwrap_err();
        assert!(matches!(err, InferenceError::ModelUnavailable(ref m) if m == "medgemma"));
    }

    #[test]
    fn classifier_without_token_fails_at_call_time() {
        let client = HuggingFaceClient::new("http://localhost:9", None, 5).unwrap();
        let model = ClassifierDiagnosisModel::new(client, "DATEXIS/CORe-clinical-diagnosis-prediction");
        assert!(matches!(
            model.diagnose("chest pain"),
            Err(InferenceError::MissingCredential("HF_API_TOKEN"))
        ));
    }

    #[test]
    fn mock_records_prompts() {
        let model = MockDiagnosisModel::new(vec![]);
        model.diagnose("p1").unwrap();
        assert_eq!(model.prompts(), vec!["p1".to_string()]);
        assert!(MockDiagnosisModel::failing().diagnose("p").is_err());
    }
}
