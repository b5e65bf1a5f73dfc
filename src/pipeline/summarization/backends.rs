use std::sync::Mutex;

use super::types::{GenerationParams, SummarizationModel};
use crate::pipeline::inference::{GenerateOptions, HuggingFaceClient, InferenceError, LlmClient};

/// Hosted seq2seq summarizer (e.g. `facebook/bart-large-cnn`).
pub struct HuggingFaceSummarizer {
    client: HuggingFaceClient,
    model: String,
}

impl HuggingFaceSummarizer {
    pub fn new(client: HuggingFaceClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

impl SummarizationModel for HuggingFaceSummarizer {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String, InferenceError> {
        self.client.summarize(&self.model, text, params)
    }
}

const SUMMARY_SYSTEM_PROMPT: &str = "You are a clinical documentation assistant. \
Summarize medical report text faithfully. Do not add findings that are not in the text. \
Reply with the summary only.";

/// Summarizer backed by a local generative model.
pub struct OllamaSummarizer {
    client: Box<dyn LlmClient>,
    model: String,
}

impl OllamaSummarizer {
    pub fn new(client: Box<dyn LlmClient>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

/// Prompt asking for a summary in the length window of `params`.
pub fn build_summary_prompt(text: &str, params: &GenerationParams) -> String {
    format!(
        "Summarize the following medical report excerpt in {} to {} words.\n\n{}",
        params.min_length, params.max_length, text
    )
}

impl SummarizationModel for OllamaSummarizer {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String, InferenceError> {
        let options = GenerateOptions {
            temperature: if params.do_sample { 0.7 } else { 0.0 },
            // Tokens run longer than words; leave headroom over the word cap.
            max_tokens: Some(params.max_length * 2),
        };
        let prompt = build_summary_prompt(text, params);
        let summary = self
            .client
            .generate(&self.model, &prompt, SUMMARY_SYSTEM_PROMPT, &options)?;
        Ok(summary.trim().to_string())
    }
}

// ═══════════════════════════════════════════════════════════
// Mock
// ═══════════════════════════════════════════════════════════

enum MockReply {
    /// `[input]`
    Echo,
    Fixed(String),
    Fail,
}

/// Test double recording every call it receives.
pub struct MockSummarizationModel {
    reply: MockReply,
    fail_on_call: Option<usize>,
    calls: Mutex<Vec<(String, GenerationParams)>>,
}

impl MockSummarizationModel {
    fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            fail_on_call: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replies with the input wrapped in brackets.
    pub fn echo() -> Self {
        Self::with_reply(MockReply::Echo)
    }

    pub fn fixed(summary: &str) -> Self {
        Self::with_reply(MockReply::Fixed(summary.to_string()))
    }

    /// Every call fails.
    pub fn failing() -> Self {
        Self::with_reply(MockReply::Fail)
    }

    /// Fail on the n-th call (1-based), succeed otherwise.
    pub fn fail_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    pub fn calls(&self) -> Vec<(String, GenerationParams)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl SummarizationModel for MockSummarizationModel {
    fn model_id(&self) -> &str {
        "mock-summarizer"
    }

    fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String, InferenceError> {
        let call_number = match self.calls.lock() {
            Ok(mut calls) => {
                calls.push((text.to_string(), *params));
                calls.len()
            }
            Err(_) => 0,
        };

        if self.fail_on_call == Some(call_number) {
            return Err(InferenceError::Service {
                status: 500,
                body: "mock failure".to_string(),
            });
        }

        match &self.reply {
            MockReply::Echo => Ok(format!("[{text}]")),
            MockReply::Fixed(summary) => Ok(summary.clone()),
            MockReply::Fail => Err(InferenceError::Connection("mock://summarizer".to_string())),
        }
    }
}
