//! Remote model access: Hugging Face Inference API and local Ollama.
//!
//! Both clients are blocking (`reqwest::blocking`). HTTP handlers run them
//! on the blocking pool through [`factory::ModelFactory`], which builds a
//! fresh client per operation so credentials are only read when a model
//! is actually called.

pub mod factory;
pub mod huggingface;
pub mod ollama;

pub use factory::*;
pub use huggingface::*;
pub use ollama::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("Cannot connect to model service at {0}")]
    Connection(String),

    #[error("Model service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Model is still loading (estimated {estimated_secs:.0}s)")]
    ModelLoading { estimated_secs: f64 },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Failed to parse model response: {0}")]
    ResponseParsing(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model not available: {0}")]
    ModelUnavailable(String),
}

/// Map a transport error the same way for every client.
pub(crate) fn map_transport_error(
    error: reqwest::Error,
    endpoint: &str,
    timeout_secs: u64,
) -> InferenceError {
    if error.is_connect() {
        InferenceError::Connection(endpoint.to_string())
    } else if error.is_timeout() {
        InferenceError::HttpClient(format!("Request timed out after {timeout_secs}s"))
    } else {
        InferenceError::HttpClient(error.to_string())
    }
}

/// Build the shared blocking HTTP client with the configured timeout.
pub(crate) fn build_http_client(
    timeout_secs: u64,
) -> Result<reqwest::blocking::Client, InferenceError> {
    reqwest::blocking::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(10))
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| InferenceError::HttpClient(e.to_string()))
}
