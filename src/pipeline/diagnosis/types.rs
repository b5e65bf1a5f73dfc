use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::inference::InferenceError;

/// Optional patient metadata folded into the diagnosis prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientInfo {
    pub age: Option<String>,
    pub sex: Option<String>,
    pub chief_complaint: Option<String>,
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
}

impl PatientInfo {
    /// Non-blank fields as `(label, value)` in prompt order.
    pub fn present_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Age", &self.age),
            ("Sex", &self.sex),
            ("Chief Complaint", &self.chief_complaint),
            ("Medical History", &self.medical_history),
            ("Current Medications", &self.current_medications),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (label, v))
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }
}

/// One ranked candidate. Classifiers fill `confidence` (0..=1),
/// generative models fill `reasoning`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl DiagnosisResult {
    pub fn scored(label: &str, confidence: f32) -> Self {
        Self {
            label: label.to_string(),
            confidence: Some(confidence),
            reasoning: None,
        }
    }

    pub fn reasoned(label: &str, reasoning: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            confidence: None,
            reasoning: reasoning.map(str::to_string),
        }
    }
}

/// A ranked model answer (classifier labels or parsed generative entries).
pub trait DiagnosisModel: Send + Sync {
    fn model_id(&self) -> &str;

    fn diagnose(&self, prompt: &str) -> Result<Vec<DiagnosisResult>, InferenceError>;
}

/// Successful diagnosis: model, ranked results in model order, and the
/// Markdown rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub model: String,
    pub diagnoses: Vec<DiagnosisResult>,
    pub diagnosis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDiagnosisEntry {
    pub diagnosis: String,
}

/// Machine-readable record of a diagnosis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDiagnosisOutput {
    pub model: String,
    pub diagnoses: Vec<RawDiagnosisEntry>,
    pub timestamp: String,
}

impl Diagnosis {
    pub fn raw_output(&self) -> RawDiagnosisOutput {
        self.raw_output_at(Utc::now())
    }

    pub fn raw_output_at(&self, at: DateTime<Utc>) -> RawDiagnosisOutput {
        RawDiagnosisOutput {
            model: self.model.clone(),
            diagnoses: self
                .diagnoses
                .iter()
                .map(|d| RawDiagnosisEntry {
                    // Every `LABEL_` marker is dropped, not only a leading one.
                    diagnosis: d.label.replace("LABEL_", ""),
                })
                .collect(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Tagged result of a diagnosis action. Check the tag before reading text.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosisOutcome {
    Success(Diagnosis),
    Failed { error: String },
}

impl DiagnosisOutcome {
    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self::Failed {
            error: format!("Error generating diagnosis: {error}"),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        match self {
            Self::Success(d) => Some(d),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failed { error } => Some(error),
        }
    }
}
