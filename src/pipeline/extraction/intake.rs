//! Report intake: detect what was uploaded and pull its text out.

use std::path::Path;

use base64::Engine;
use serde::Serialize;

use super::ocr::run_ocr;
use super::types::{OcrEngine, PdfExtractor};
use super::ExtractionError;

/// Message used whenever an upload yields no usable text.
pub const NO_TEXT_MESSAGE: &str = "No text could be extracted from the document.";

/// Extensions routed to OCR.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

/// An uploaded or pasted report, before extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSource {
    Pdf(Vec<u8>),
    Image(Vec<u8>),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Pdf,
    Image,
    Text,
}

impl ReportSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Pdf(_) => SourceKind::Pdf,
            Self::Image(_) => SourceKind::Image,
            Self::Text(_) => SourceKind::Text,
        }
    }

    /// Classify raw bytes by magic number; anything else must be UTF-8 text.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ExtractionError> {
        match bytes.as_slice() {
            [0x25, 0x50, 0x44, 0x46, 0x2D, ..] => Ok(Self::Pdf(bytes)),
            [0xFF, 0xD8, 0xFF, ..]
            | [0x89, 0x50, 0x4E, 0x47, ..]
            | [0x49, 0x49, 0x2A, 0x00, ..]
            | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(Self::Image(bytes)),
            _ => String::from_utf8(bytes)
                .map(Self::Text)
                .map_err(|_| ExtractionError::UnsupportedFormat),
        }
    }

    /// Read a report from disk. The extension decides the type (`.pdf`,
    /// image extensions, otherwise text); files without a known extension
    /// fall back to magic-byte detection.
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let bytes = std::fs::read(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("pdf") => Ok(Self::Pdf(bytes)),
            Some(e) if IMAGE_EXTENSIONS.contains(&e) => Ok(Self::Image(bytes)),
            Some("txt") | Some("md") => String::from_utf8(bytes)
                .map(Self::Text)
                .map_err(|e| ExtractionError::InvalidEncoding(e.to_string())),
            _ => Self::from_bytes(bytes),
        }
    }
}

/// Text pulled out of a report, ready for preprocessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedReport {
    pub text: String,
    pub source: SourceKind,
    /// Pages read, for PDFs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    /// Status message, for OCR.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Dispatch a [`ReportSource`] to the matching collaborator.
///
/// Whitespace-only results are reported as
/// [`ExtractionError::NoTextExtracted`].
pub fn extract_report_text(
    source: &ReportSource,
    pdf: &dyn PdfExtractor,
    ocr: Option<&dyn OcrEngine>,
) -> Result<ExtractedReport, ExtractionError> {
    let report = match source {
        ReportSource::Pdf(bytes) => {
            let extracted = pdf.extract_text(bytes)?;
            ExtractedReport {
                text: extracted.text(),
                source: SourceKind::Pdf,
                page_count: Some(extracted.page_count()),
                message: None,
            }
        }
        ReportSource::Image(bytes) => {
            let engine = ocr.ok_or(ExtractionError::OcrUnavailable)?;
            let outcome = run_ocr(engine, bytes);
            match outcome.text {
                Some(text) => ExtractedReport {
                    text,
                    source: SourceKind::Image,
                    page_count: None,
                    message: Some(outcome.message),
                },
                None => return Err(ExtractionError::NoTextExtracted(outcome.message)),
            }
        }
        ReportSource::Text(text) => ExtractedReport {
            text: text.trim().to_string(),
            source: SourceKind::Text,
            page_count: None,
            message: None,
        },
    };

    if report.text.trim().is_empty() {
        tracing::info!(source = ?report.source, "No text extracted");
        return Err(ExtractionError::NoTextExtracted(NO_TEXT_MESSAGE.to_string()));
    }

    tracing::info!(
        source = ?report.source,
        chars = report.text.len(),
        pages = ?report.page_count,
        "Report text extracted"
    );
    Ok(report)
}

/// Decode a base64 upload, accepting a `data:...;base64,` prefix.
pub fn decode_base64_payload(payload: &str) -> Result<Vec<u8>, ExtractionError> {
    let encoded = match payload.find(',') {
        Some(idx) if payload.starts_with("data:") => &payload[idx + 1..],
        _ => payload,
    };
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err(ExtractionError::InvalidEncoding("empty upload".into()));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| ExtractionError::InvalidEncoding(format!("Base64 decode failed: {e}")))?;
    if bytes.is_empty() {
        return Err(ExtractionError::InvalidEncoding("empty upload".into()));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::ocr::fixtures::make_test_png;
    use crate::pipeline::extraction::pdf::fixtures::make_test_pdf;
    use crate::pipeline::extraction::{MockOcrEngine, PdfTextExtractor, OCR_EMPTY_MESSAGE};

    #[test]
    fn detects_sources_from_magic_bytes() {
        assert_eq!(
            ReportSource::from_bytes(b"%PDF-1.4 ...".to_vec()).unwrap().kind(),
            SourceKind::Pdf
        );
        assert_eq!(
            ReportSource::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]).unwrap().kind(),
            SourceKind::Image
        );
        assert_eq!(
            ReportSource::from_bytes(make_test_png()).unwrap().kind(),
            SourceKind::Image
        );
        assert_eq!(
            ReportSource::from_bytes(b"Chief Complaint: chest pain".to_vec()).unwrap(),
            ReportSource::Text("Chief Complaint: chest pain".into())
        );
    }

    #[test]
    fn binary_garbage_is_unsupported() {
        let err = ReportSource::from_bytes(vec![0x00, 0xFF, 0xFE, 0x80]).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat));
    }

    #[test]
    fn path_extension_decides_type() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, "Diagnosis: suspected MI").unwrap();
        assert_eq!(
            ReportSource::from_path(&txt).unwrap(),
            ReportSource::Text("Diagnosis: suspected MI".into())
        );

        let scan = dir.path().join("scan.JPG");
        std::fs::write(&scan, [0u8, 1, 2]).unwrap();
        assert_eq!(ReportSource::from_path(&scan).unwrap().kind(), SourceKind::Image);

        let unknown = dir.path().join("report");
        std::fs::write(&unknown, make_test_pdf(&["x"])).unwrap();
        assert_eq!(ReportSource::from_path(&unknown).unwrap().kind(), SourceKind::Pdf);
    }

    #[test]
    fn extracts_pdf_with_page_count() {
        let source = ReportSource::Pdf(make_test_pdf(&["Chief Complaint: chest pain", "Treatment: aspirin"]));
        let report = extract_report_text(&source, &PdfTextExtractor, None).unwrap();
        assert_eq!(report.page_count, Some(2));
        assert!(report.text.contains("chest pain"));
    }

    #[test]
    fn image_needs_an_ocr_engine() {
        let source = ReportSource::Image(make_test_png());
        let err = extract_report_text(&source, &PdfTextExtractor, None).unwrap_err();
        assert!(matches!(err, ExtractionError::OcrUnavailable));
    }

    #[test]
    fn image_text_comes_with_message() {
        let engine = MockOcrEngine::new("HR 95 bpm", 0.8);
        let source = ReportSource::Image(make_test_png());
        let report = extract_report_text(&source, &PdfTextExtractor, Some(&engine)).unwrap();
        assert_eq!(report.text, "HR 95 bpm");
        assert_eq!(report.message.as_deref(), Some("Text extracted successfully from image."));
    }

    #[test]
    fn blank_image_is_no_text_extracted() {
        let engine = MockOcrEngine::new("", 0.0);
        let source = ReportSource::Image(make_test_png());
        let err = extract_report_text(&source, &PdfTextExtractor, Some(&engine)).unwrap_err();
        assert!(matches!(err, ExtractionError::NoTextExtracted(ref m) if m == OCR_EMPTY_MESSAGE));
    }

    #[test]
    fn whitespace_text_is_no_text_extracted() {
        let err = extract_report_text(&ReportSource::Text(" \n ".into()), &PdfTextExtractor, None)
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NoTextExtracted(_)));
    }

    #[test]
    fn decodes_plain_and_data_url_base64() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"hello");
        assert_eq!(decode_base64_payload(&encoded).unwrap(), b"hello");
        let data_url = format!("data:application/pdf;base64,{encoded}");
        assert_eq!(decode_base64_payload(&data_url).unwrap(), b"hello");
    }

    #[test]
    fn rejects_bad_or_empty_base64() {
        assert!(matches!(
            decode_base64_payload("not-valid-base64!!!"),
            Err(ExtractionError::InvalidEncoding(_))
        ));
        assert!(decode_base64_payload("").is_err());
        assert!(decode_base64_payload("data:image/png;base64,").is_err());
    }
}
