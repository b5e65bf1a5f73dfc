use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{build_http_client, map_transport_error, InferenceError};
use crate::config::ServiceConfig;
use crate::pipeline::summarization::GenerationParams;

/// Words kept from a classifier prompt. The hosted classifiers cap input
/// at 512 tokens and reject longer payloads instead of truncating.
pub const CLASSIFIER_MAX_WORDS: usize = 400;

/// Blocking client for the Hugging Face Inference API.
///
/// The API token is optional at construction and only checked when a
/// request is about to be sent.
pub struct HuggingFaceClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

/// One ranked label from a text-classification model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

// ═══════════════════════════════════════════════════════════
// Wire types
// ═══════════════════════════════════════════════════════════

#[derive(Serialize)]
struct InferenceRequest<'a, P: Serialize> {
    inputs: &'a str,
    parameters: P,
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Serialize)]
struct ClassificationParameters {
    top_k: usize,
}

#[derive(Deserialize)]
struct SummaryItem {
    summary_text: String,
}

/// Classification output comes back nested for a single input on some
/// deployments and flat on others.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    estimated_time: Option<f64>,
}

// ═══════════════════════════════════════════════════════════
// Client
// ═══════════════════════════════════════════════════════════

impl HuggingFaceClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, InferenceError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: build_http_client(timeout_secs)?,
            timeout_secs,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, InferenceError> {
        Self::new(
            &config.hf_inference_url,
            config.hf_api_token.clone(),
            config.model_timeout_secs,
        )
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    /// Abstractive summary of `text` with the given generation parameters.
    pub fn summarize(
        &self,
        model: &str,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, InferenceError> {
        let body = InferenceRequest {
            inputs: text,
            parameters: params,
            options: RequestOptions { wait_for_model: true },
        };
        let items: Vec<SummaryItem> = self.post(model, &body)?;
        let summary = items
            .into_iter()
            .next()
            .map(|item| item.summary_text.trim().to_string())
            .unwrap_or_default();
        if summary.is_empty() {
            return Err(InferenceError::EmptyResponse);
        }
        Ok(summary)
    }

    /// Top-`top_k` labels for `text`, in the model's ranking.
    pub fn classify(
        &self,
        model: &str,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<LabelScore>, InferenceError> {
        let truncated = truncate_words(text, CLASSIFIER_MAX_WORDS);
        let body = InferenceRequest {
            inputs: &truncated,
            parameters: ClassificationParameters { top_k },
            options: RequestOptions { wait_for_model: true },
        };
        let response: ClassificationResponse = self.post(model, &body)?;
        let mut labels = match response {
            ClassificationResponse::Nested(mut outer) => {
                if outer.is_empty() {
                    Vec::new()
                } else {
                    outer.swap_remove(0)
                }
            }
            ClassificationResponse::Flat(labels) => labels,
        };
        labels.truncate(top_k);
        Ok(labels)
    }

    fn post<B, R>(&self, model: &str, body: &B) -> Result<R, InferenceError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let token = self
            .token
            .as_deref()
            .ok_or(InferenceError::MissingCredential("HF_API_TOKEN"))?;
        let url = self.model_url(model);

        tracing::debug!(model, "Calling Hugging Face inference");
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .map_err(|e| map_transport_error(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| InferenceError::HttpClient(e.to_string()))?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| InferenceError::ResponseParsing(e.to_string()))
    }
}

/// Interpret a non-success body: `{"error": ..., "estimated_time": ...}`
/// when the API produced it, raw text otherwise.
fn error_from_body(status: u16, body: &str) -> InferenceError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            estimated_time: Some(estimated_secs),
            ..
        }) if status == 503 => InferenceError::ModelLoading { estimated_secs },
        Ok(parsed) => InferenceError::Service {
            status,
            body: parsed.error,
        },
        Err(_) => InferenceError::Service {
            status,
            body: body.to_string(),
        },
    }
}

/// Keep at most `max_words` whitespace-separated words.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}
