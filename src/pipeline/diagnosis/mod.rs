//! Candidate diagnoses from clinical text.
//!
//! Builds one prompt from patient metadata and notes, sends it to either a
//! label classifier or a generative model, and renders the ranked result
//! as Markdown.

pub mod backends;
pub mod client;
pub mod format;
pub mod prompt;
pub mod types;

pub use backends::*;
pub use client::*;
pub use format::*;
pub use prompt::*;
pub use types::*;

use thiserror::Error;

use crate::pipeline::inference::InferenceError;

#[derive(Error, Debug)]
pub enum DiagnosisError {
    #[error("No clinical text provided")]
    EmptyInput,

    #[error(transparent)]
    Inference(#[from] InferenceError),
}
