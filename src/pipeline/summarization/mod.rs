//! Chunked abstractive summarization of report text.
//!
//! The report is split into word-budget chunks, each chunk is summarized in
//! order by a [`SummarizationModel`], and the partial summaries are joined.
//! Any model failure fails the whole report.

pub mod backends;
pub mod chunker;
pub mod client;
pub mod types;

pub use backends::*;
pub use chunker::*;
pub use client::*;
pub use types::*;

use thiserror::Error;

use crate::pipeline::inference::InferenceError;

/// Default chunk budget, in "word length + 1" units.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

#[derive(Error, Debug)]
pub enum SummarizationError {
    #[error("Nothing to summarize")]
    EmptyInput,

    #[error("Summarization failed on chunk {chunk} of {total}: {source}")]
    ChunkFailed {
        chunk: usize,
        total: usize,
        #[source]
        source: InferenceError,
    },

    #[error("Summarization failed for section {section}: {source}")]
    SectionFailed {
        section: String,
        #[source]
        source: InferenceError,
    },
}
