use std::str::FromStr;

use crate::pipeline::preprocess::SectionMatchPolicy;

/// Application-level constants
pub const APP_NAME: &str = "MedReport";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Hugging Face Inference API endpoint (per-model URLs are appended).
pub const DEFAULT_HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
/// Default local Ollama instance.
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
/// Default abstractive summarization model.
pub const DEFAULT_SUMMARY_MODEL: &str = "facebook/bart-large-cnn";
/// Default clinical diagnosis classifier.
pub const DEFAULT_DIAGNOSIS_MODEL: &str = "DATEXIS/CORe-clinical-diagnosis-prediction";
/// Default generative model for narrative diagnoses.
pub const DEFAULT_GENERATIVE_MODEL: &str = "medgemma";
/// Default tessdata directory (Debian/Ubuntu tesseract 5 layout).
pub const DEFAULT_TESSDATA_DIR: &str = "/usr/share/tesseract-ocr/5/tessdata";

/// Room left in the request body for the JSON around an upload.
const JSON_ENVELOPE_BYTES: usize = 64 * 1024;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medreport=info,medreport_lib=info,tower_http=warn"
}

/// Which service produces summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryBackend {
    HuggingFace,
    Ollama,
}

impl FromStr for SummaryBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "ollama" => Ok(Self::Ollama),
            other => Err(format!("unknown summary backend '{other}'")),
        }
    }
}

/// Which kind of model produces diagnoses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosisBackend {
    /// Multi-label classifier returning (label, score) pairs.
    Classifier,
    /// Generative model returning a numbered narrative.
    Generative,
}

impl FromStr for DiagnosisBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classifier" | "classification" => Ok(Self::Classifier),
            "generative" | "ollama" => Ok(Self::Generative),
            other => Err(format!("unknown diagnosis backend '{other}'")),
        }
    }
}

/// Runtime configuration, read once from the environment at startup.
///
/// Credentials are carried as-is and never validated here: a missing
/// `HF_API_TOKEN` only surfaces when a model is first called.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub max_upload_bytes: usize,
    pub chunk_size: usize,
    pub section_policy: SectionMatchPolicy,
    pub summary_backend: SummaryBackend,
    pub summary_model: String,
    pub diagnosis_backend: DiagnosisBackend,
    pub diagnosis_model: String,
    pub generative_model: String,
    pub hf_api_token: Option<String>,
    pub hf_inference_url: String,
    pub ollama_host: String,
    pub model_timeout_secs: u64,
    pub tessdata_dir: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8501".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            chunk_size: crate::pipeline::summarization::DEFAULT_CHUNK_SIZE,
            section_policy: SectionMatchPolicy::default(),
            summary_backend: SummaryBackend::HuggingFace,
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
            diagnosis_backend: DiagnosisBackend::Classifier,
            diagnosis_model: DEFAULT_DIAGNOSIS_MODEL.to_string(),
            generative_model: DEFAULT_GENERATIVE_MODEL.to_string(),
            hf_api_token: None,
            hf_inference_url: DEFAULT_HF_INFERENCE_URL.to_string(),
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            model_timeout_secs: 300,
            tessdata_dir: DEFAULT_TESSDATA_DIR.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Build configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            bind_addr: get("MEDREPORT_ADDR").unwrap_or(defaults.bind_addr),
            max_upload_bytes: parse_or(
                "MEDREPORT_MAX_UPLOAD_BYTES",
                get("MEDREPORT_MAX_UPLOAD_BYTES"),
                defaults.max_upload_bytes,
            ),
            chunk_size: parse_or(
                "MEDREPORT_CHUNK_SIZE",
                get("MEDREPORT_CHUNK_SIZE"),
                defaults.chunk_size,
            ),
            section_policy: parse_or(
                "MEDREPORT_SECTION_POLICY",
                get("MEDREPORT_SECTION_POLICY"),
                defaults.section_policy,
            ),
            summary_backend: parse_or(
                "SUMMARY_BACKEND",
                get("SUMMARY_BACKEND"),
                defaults.summary_backend,
            ),
            summary_model: get("SUMMARY_MODEL").unwrap_or(defaults.summary_model),
            diagnosis_backend: parse_or(
                "DIAGNOSIS_BACKEND",
                get("DIAGNOSIS_BACKEND"),
                defaults.diagnosis_backend,
            ),
            diagnosis_model: get("DIAGNOSIS_MODEL").unwrap_or(defaults.diagnosis_model),
            generative_model: get("DIAGNOSIS_GENERATIVE_MODEL")
                .unwrap_or(defaults.generative_model),
            hf_api_token: get("HF_API_TOKEN"),
            hf_inference_url: get("HF_INFERENCE_URL").unwrap_or(defaults.hf_inference_url),
            ollama_host: get("OLLAMA_HOST").unwrap_or(defaults.ollama_host),
            model_timeout_secs: parse_or(
                "MODEL_TIMEOUT_SECS",
                get("MODEL_TIMEOUT_SECS"),
                defaults.model_timeout_secs,
            ),
            tessdata_dir: get("TESSDATA_PREFIX").unwrap_or(defaults.tessdata_dir),
        }
    }

    /// Request body cap. `max_upload_bytes` limits the decoded file, so the
    /// body must fit its base64 encoding (4 bytes per 3) plus the JSON.
    pub fn max_request_body_bytes(&self) -> usize {
        self.max_upload_bytes
            .div_ceil(3)
            .saturating_mul(4)
            .saturating_add(JSON_ENVELOPE_BYTES)
    }

    /// Identifier of the model currently configured for diagnoses.
    pub fn active_diagnosis_model(&self) -> &str {
        match self.diagnosis_backend {
            DiagnosisBackend::Classifier => &self.diagnosis_model,
            DiagnosisBackend::Generative => &self.generative_model,
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr,
{
    match raw {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %value, "Invalid configuration value, using default");
            default
        }),
    }
}
