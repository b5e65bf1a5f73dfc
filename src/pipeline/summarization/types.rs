use std::collections::BTreeMap;

use serde::Serialize;

use crate::pipeline::inference::InferenceError;
use crate::pipeline::preprocess::SectionName;

/// Text shown in place of a summary when summarization failed.
pub const SUMMARY_FAILURE_SENTINEL: &str = "Error occurred during summarization";

/// Decoding parameters sent with every summarization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationParams {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

impl GenerationParams {
    /// Whole-report chunks.
    pub fn report() -> Self {
        Self {
            max_length: 130,
            min_length: 30,
            do_sample: false,
        }
    }

    /// Single sections.
    pub fn section() -> Self {
        Self {
            max_length: 150,
            min_length: 30,
            do_sample: false,
        }
    }
}

/// An abstractive summarization model.
pub trait SummarizationModel: Send + Sync {
    fn model_id(&self) -> &str;

    fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String, InferenceError>;
}

/// Result of a summarization action. Failures carry a reason and render as
/// [`SUMMARY_FAILURE_SENTINEL`]; they are never content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Generated { summary: String },
    Failed { reason: String },
}

impl SummaryOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// User-facing text: the summary, or the failure sentinel.
    pub fn text(&self) -> &str {
        match self {
            Self::Generated { summary } => summary,
            Self::Failed { .. } => SUMMARY_FAILURE_SENTINEL,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Generated { .. } => None,
            Self::Failed { reason } => Some(reason),
        }
    }
}

/// Summary of a whole report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub outcome: SummaryOutcome,
    /// Chunks sent to the model (zero when nothing was sent).
    pub chunk_count: usize,
}

/// Summaries of the individual report sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummaries {
    /// Every section, summarized or empty. Empty sections are never sent.
    pub sections: BTreeMap<SectionName, String>,
    /// `"Label: summary"` blocks separated by a blank line, or the
    /// failure outcome.
    pub outcome: SummaryOutcome,
    /// Non-empty sections sent to the model.
    pub section_count: usize,
}
