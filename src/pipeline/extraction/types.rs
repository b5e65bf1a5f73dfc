use serde::Serialize;

use super::ExtractionError;

/// Text layer of a digital PDF, one entry per page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfText {
    pub pages: Vec<String>,
}

impl PdfText {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All pages joined with a newline, trimmed.
    pub fn text(&self) -> String {
        self.pages.join("\n").trim().to_string()
    }
}

/// Raw OCR result from the engine
#[derive(Debug, Clone, PartialEq)]
pub struct OcrPageResult {
    pub text: String,
    /// Mean word confidence, 0.0..=1.0.
    pub confidence: f32,
}

/// OCR result as shown to the user: text when something was read, and a
/// status message either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OcrOutcome {
    pub text: Option<String>,
    pub message: String,
}

/// OCR engine abstraction (allows mocking for tests)
pub trait OcrEngine: Send + Sync {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError>;
}

/// PDF text extraction abstraction
pub trait PdfExtractor: Send + Sync {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<PdfText, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_text_joins_pages() {
        let pdf = PdfText {
            pages: vec!["Page one\n".into(), "Page two".into(), String::new()],
        };
        assert_eq!(pdf.page_count(), 3);
        assert_eq!(pdf.text(), "Page one\n\nPage two");
    }
}
