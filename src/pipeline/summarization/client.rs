use std::collections::BTreeMap;

use super::chunker::{Chunker, WordBudgetChunker};
use super::types::{
    GenerationParams, ReportSummary, SectionSummaries, SummarizationModel, SummaryOutcome,
};
use super::SummarizationError;
use crate::config::ServiceConfig;
use crate::pipeline::preprocess::{clean_report_text, SectionExtractor, SectionMap, SectionName};

/// Drives a [`SummarizationModel`] over chunks or sections of a report.
pub struct SummarizationClient<'a> {
    model: &'a dyn SummarizationModel,
    chunker: Box<dyn Chunker + 'a>,
    extractor: SectionExtractor,
}

impl<'a> SummarizationClient<'a> {
    pub fn new(model: &'a dyn SummarizationModel) -> Self {
        Self {
            model,
            chunker: Box::new(WordBudgetChunker::default()),
            extractor: SectionExtractor::new(),
        }
    }

    /// Client using the configured chunk budget and section policy.
    pub fn from_config(model: &'a dyn SummarizationModel, config: &ServiceConfig) -> Self {
        Self::new(model)
            .with_chunker(WordBudgetChunker::new(config.chunk_size))
            .with_extractor(SectionExtractor::with_policy(config.section_policy))
    }

    pub fn with_chunker(mut self, chunker: impl Chunker + 'a) -> Self {
        self.chunker = Box::new(chunker);
        self
    }

    pub fn with_extractor(mut self, extractor: SectionExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Summarize one bounded piece of text. Errors become a failed outcome.
    pub fn summarize_chunk(&self, chunk: &str, params: &GenerationParams) -> SummaryOutcome {
        match self.model.summarize(chunk, params) {
            Ok(summary) => SummaryOutcome::Generated { summary },
            Err(e) => {
                tracing::warn!(model = %self.model.model_id(), error = %e, "Summarization call failed");
                SummaryOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Summarize a full report: chunk, summarize each chunk in order, join
    /// with a single space. The first failing chunk fails the report.
    pub fn summarize_report(&self, text: &str) -> ReportSummary {
        let chunks = self.chunker.chunk(text);
        let chunk_count = chunks.len();

        let outcome = match self.summarize_chunks(&chunks) {
            Ok(summary) => SummaryOutcome::Generated { summary },
            Err(e) => {
                tracing::warn!(error = %e, "Report summarization failed");
                SummaryOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        ReportSummary {
            outcome,
            chunk_count,
        }
    }

    fn summarize_chunks(&self, chunks: &[String]) -> Result<String, SummarizationError> {
        if chunks.is_empty() {
            return Err(SummarizationError::EmptyInput);
        }

        let total = chunks.len();
        let mut parts = Vec::with_capacity(total);
        for (i, chunk) in chunks.iter().enumerate() {
            tracing::debug!(chunk = i + 1, total, "Summarizing chunk");
            let part = self
                .model
                .summarize(chunk, &GenerationParams::report())
                .map_err(|source| SummarizationError::ChunkFailed {
                    chunk: i + 1,
                    total,
                    source,
                })?;
            parts.push(part);
        }

        tracing::info!(model = %self.model.model_id(), chunks = total, "Report summarized");
        Ok(parts.join(" "))
    }

    /// Summary per section. Empty sections stay empty and are not sent to
    /// the model; any failing section fails the whole map.
    pub fn summarize_sections_map(
        &self,
        sections: &SectionMap,
    ) -> Result<BTreeMap<SectionName, String>, SummarizationError> {
        let mut summaries = BTreeMap::new();
        for (name, text) in sections.iter() {
            if text.trim().is_empty() {
                summaries.insert(name, String::new());
                continue;
            }
            let summary = self
                .model
                .summarize(text, &GenerationParams::section())
                .map_err(|source| SummarizationError::SectionFailed {
                    section: name.label().to_string(),
                    source,
                })?;
            summaries.insert(name, summary);
        }
        Ok(summaries)
    }

    /// Summarize already-extracted sections and render them as
    /// `"Label: summary"` blocks separated by a blank line.
    pub fn summarize_sections(&self, sections: &SectionMap) -> SectionSummaries {
        let sent = sections.iter().filter(|(_, t)| !t.trim().is_empty()).count();
        let empty_map = || {
            SectionName::all()
                .into_iter()
                .map(|name| (name, String::new()))
                .collect()
        };

        if sent == 0 {
            return SectionSummaries {
                sections: empty_map(),
                outcome: SummaryOutcome::Failed {
                    reason: "No recognizable report sections found".to_string(),
                },
                section_count: 0,
            };
        }

        match self.summarize_sections_map(sections) {
            Ok(map) => {
                let rendered = render_section_summaries(&map);
                tracing::info!(model = %self.model.model_id(), sections = sent, "Sections summarized");
                SectionSummaries {
                    sections: map,
                    outcome: SummaryOutcome::Generated { summary: rendered },
                    section_count: sent,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Section summarization failed");
                SectionSummaries {
                    sections: empty_map(),
                    outcome: SummaryOutcome::Failed {
                        reason: e.to_string(),
                    },
                    section_count: sent,
                }
            }
        }
    }

    /// Clean the raw report, bucket it into sections, then summarize them.
    pub fn summarize_report_sections(&self, text: &str) -> SectionSummaries {
        let cleaned = clean_report_text(text);
        let sections = self.extractor.extract(&cleaned);
        self.summarize_sections(&sections)
    }
}

/// Render non-empty section summaries in priority order.
pub fn render_section_summaries(summaries: &BTreeMap<SectionName, String>) -> String {
    summaries
        .iter()
        .filter(|(_, summary)| !summary.trim().is_empty())
        .map(|(name, summary)| format!("{}: {}", name.label(), summary))
        .collect::<Vec<_>>()
        .join("\n\n")
}
