//! Text extraction from uploaded reports: digital PDFs, images (OCR) and
//! plain text.

pub mod intake;
pub mod ocr;
pub mod pdf;
pub mod types;

pub use intake::*;
pub use ocr::*;
pub use pdf::*;
pub use types::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tesseract OCR initialization failed: {0}")]
    OcrInit(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("OCR is not available in this build")]
    OcrUnavailable,

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Tessdata not found at: {0}")]
    TessdataNotFound(PathBuf),

    #[error("{0}")]
    NoTextExtracted(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("Unsupported format for extraction")]
    UnsupportedFormat,
}
