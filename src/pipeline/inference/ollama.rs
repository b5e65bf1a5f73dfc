use serde::{Deserialize, Serialize};

use super::{build_http_client, map_transport_error, InferenceError};
use crate::config::ServiceConfig;

/// Generation options forwarded to Ollama.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    /// Maximum tokens to generate (`num_predict`).
    #[serde(rename = "num_predict", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: None,
        }
    }
}

/// Text generation over a local LLM runtime.
pub trait LlmClient: Send + Sync {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        options: &GenerateOptions,
    ) -> Result<String, InferenceError>;

    fn list_models(&self) -> Result<Vec<String>, InferenceError>;

    /// Tags are matched by prefix so `medgemma` finds `medgemma:4b`.
    fn is_model_available(&self, model: &str) -> Result<bool, InferenceError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(model)))
    }
}

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, InferenceError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_http_client(timeout_secs)?,
            timeout_secs,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, InferenceError> {
        Self::new(&config.ollama_host, config.model_timeout_secs)
    }

    fn check_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, InferenceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(InferenceError::Service {
            status: status.as_u16(),
            body,
        })
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: &'a GenerateOptions,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        options: &GenerateOptions,
    ) -> Result<String, InferenceError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            options,
        };

        tracing::debug!(model, prompt_len = prompt.len(), "Calling Ollama generate");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| map_transport_error(e, &self.base_url, self.timeout_secs))?;

        let parsed: OllamaGenerateResponse = Self::check_status(response)?
            .json()
            .map_err(|e| InferenceError::ResponseParsing(e.to_string()))?;

        if parsed.response.trim().is_empty() {
            return Err(InferenceError::EmptyResponse);
        }
        Ok(parsed.response)
    }

    fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| map_transport_error(e, &self.base_url, self.timeout_secs))?;

        let parsed: OllamaTagsResponse = Self::check_status(response)?
            .json()
            .map_err(|e| InferenceError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Mock LLM client for testing: returns a configurable response or error.
pub struct MockLlmClient {
    response: Option<String>,
    available_models: Vec<String>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            available_models: vec!["medgemma:latest".to_string()],
        }
    }

    /// A client whose `generate` always fails with a connection error.
    pub fn failing() -> Self {
        Self {
            response: None,
            available_models: vec!["medgemma:latest".to_string()],
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
        _options: &GenerateOptions,
    ) -> Result<String, InferenceError> {
        self.response
            .clone()
            .ok_or_else(|| InferenceError::Connection("mock://ollama".to_string()))
    }

    fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        Ok(self.available_models.clone())
    }
}
