use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageOutputFormat};

use super::types::{OcrEngine, OcrOutcome, OcrPageResult};
use super::ExtractionError;

pub const OCR_SUCCESS_MESSAGE: &str = "Text extracted successfully from image.";
pub const OCR_EMPTY_MESSAGE: &str =
    "No text could be extracted from the image. The image might be blurry or contain no text.";

/// Bundled Tesseract OCR engine.
/// Only available when compiled with the `ocr` feature flag.
#[cfg(feature = "ocr")]
pub struct BundledTesseract {
    tessdata_dir: std::path::PathBuf,
}

#[cfg(feature = "ocr")]
impl BundledTesseract {
    /// Initialize with a tessdata directory containing `eng.traineddata`.
    pub fn new(tessdata_dir: &std::path::Path) -> Result<Self, ExtractionError> {
        if !tessdata_dir.join("eng.traineddata").exists() {
            return Err(ExtractionError::TessdataNotFound(tessdata_dir.to_path_buf()));
        }
        Ok(Self {
            tessdata_dir: tessdata_dir.to_path_buf(),
        })
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for BundledTesseract {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        let tessdata_str = self
            .tessdata_dir
            .to_str()
            .ok_or_else(|| ExtractionError::OcrInit("Invalid tessdata path".into()))?;

        let mut tess = tesseract::Tesseract::new(Some(tessdata_str), Some("eng"))
            .map_err(|e| ExtractionError::OcrInit(format!("{e:?}")))?
            .set_image_from_mem(image_bytes)
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;

        let text = tess
            .get_text()
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;
        let confidence = tess.mean_text_conf().max(0) as f32 / 100.0;

        Ok(OcrPageResult { text, confidence })
    }
}

/// Build the OCR engine for this build, if any.
///
/// Without the `ocr` feature, or when tessdata is missing, image uploads
/// are rejected with [`ExtractionError::OcrUnavailable`].
pub fn default_ocr_engine(tessdata_dir: &str) -> Option<Arc<dyn OcrEngine>> {
    #[cfg(feature = "ocr")]
    {
        match BundledTesseract::new(std::path::Path::new(tessdata_dir)) {
            Ok(engine) => {
                tracing::info!(tessdata = tessdata_dir, "Tesseract OCR ready");
                Some(Arc::new(engine))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Tesseract OCR unavailable");
                None
            }
        }
    }
    #[cfg(not(feature = "ocr"))]
    {
        tracing::info!(tessdata = tessdata_dir, "Built without the ocr feature, image OCR disabled");
        None
    }
}

/// Decode an image and re-encode it as 8-bit grayscale PNG for OCR.
pub fn prepare_for_ocr(image_bytes: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    let img = image::load_from_memory(image_bytes)
        .map_err(|e| ExtractionError::ImageProcessing(format!("Failed to decode image: {e}")))?;
    let gray = DynamicImage::ImageLuma8(img.to_luma8());

    let mut cursor = Cursor::new(Vec::new());
    gray.write_to(&mut cursor, ImageOutputFormat::Png)
        .map_err(|e| ExtractionError::ImageProcessing(format!("PNG encoding failed: {e}")))?;
    Ok(cursor.into_inner())
}

/// Grayscale the image, run OCR and fold every outcome into
/// `(text-or-none, message)`. Never fails.
pub fn run_ocr(engine: &dyn OcrEngine, image_bytes: &[u8]) -> OcrOutcome {
    let result = prepare_for_ocr(image_bytes).and_then(|gray| engine.ocr_image(&gray));
    match result {
        Ok(page) => {
            let text = page.text.trim();
            if text.is_empty() {
                tracing::info!("OCR found no text");
                OcrOutcome {
                    text: None,
                    message: OCR_EMPTY_MESSAGE.to_string(),
                }
            } else {
                tracing::info!(
                    chars = text.len(),
                    confidence = page.confidence,
                    "OCR extracted text"
                );
                OcrOutcome {
                    text: Some(text.to_string()),
                    message: OCR_SUCCESS_MESSAGE.to_string(),
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "OCR failed");
            OcrOutcome {
                text: None,
                message: format!("Error during OCR processing: {e}"),
            }
        }
    }
}

/// Mock OCR engine for unit testing without Tesseract.
pub struct MockOcrEngine {
    pub text: String,
    pub confidence: f32,
}

impl MockOcrEngine {
    pub fn new(text: &str, confidence: f32) -> Self {
        Self {
            text: text.to_string(),
            confidence,
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        // Only grayscale PNG reaches the engine.
        let img = image::load_from_memory(image_bytes)
            .map_err(|e| ExtractionError::OcrProcessing(e.to_string()))?;
        if !matches!(img, DynamicImage::ImageLuma8(_)) {
            return Err(ExtractionError::OcrProcessing("expected grayscale input".into()));
        }
        Ok(OcrPageResult {
            text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}

/// Test fixtures shared by extraction and API tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;

    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};

    /// A small solid-colour RGB image encoded as PNG.
    pub fn make_test_png() -> Vec<u8> {
        let img = RgbImage::from_pixel(8, 8, Rgb([200, 40, 40]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .unwrap();
        cursor.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::make_test_png;
    use super::*;

    #[test]
    fn prepare_converts_to_grayscale_png() {
        let gray = prepare_for_ocr(&make_test_png()).unwrap();
        assert_eq!(&gray[..4], &[0x89, 0x50, 0x4E, 0x47]);
        let decoded = image::load_from_memory(&gray).unwrap();
        assert!(matches!(decoded, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn prepare_rejects_garbage() {
        let err = prepare_for_ocr(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ExtractionError::ImageProcessing(_)));
    }

    #[test]
    fn successful_ocr_returns_text_and_message() {
        let engine = MockOcrEngine::new("  BP 140/90 mmHg\n", 0.9);
        let outcome = run_ocr(&engine, &make_test_png());
        assert_eq!(outcome.text.as_deref(), Some("BP 140/90 mmHg"));
        assert_eq!(outcome.message, OCR_SUCCESS_MESSAGE);
    }

    #[test]
    fn blank_ocr_returns_no_text() {
        let engine = MockOcrEngine::new(" \n ", 0.1);
        let outcome = run_ocr(&engine, &make_test_png());
        assert!(outcome.text.is_none());
        assert_eq!(outcome.message, OCR_EMPTY_MESSAGE);
    }

    #[test]
    fn undecodable_image_reports_error_message() {
        let engine = MockOcrEngine::new("text", 0.9);
        let outcome = run_ocr(&engine, b"garbage");
        assert!(outcome.text.is_none());
        assert!(outcome.message.starts_with("Error during OCR processing:"));
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn no_engine_without_ocr_feature() {
        assert!(default_ocr_engine("/usr/share/tesseract-ocr/5/tessdata").is_none());
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn missing_tessdata_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = BundledTesseract::new(dir.path()).err().unwrap();
        assert!(matches!(err, ExtractionError::TessdataNotFound(_)));
    }
}
