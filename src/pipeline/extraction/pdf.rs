use super::types::{PdfExtractor, PdfText};
use super::ExtractionError;

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; scanned PDFs come back
/// with empty pages.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<PdfText, ExtractionError> {
        if !pdf_bytes.starts_with(b"%PDF-") {
            return Err(ExtractionError::PdfParsing("missing %PDF- header".into()));
        }

        let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

        tracing::debug!(
            pages = pages.len(),
            chars = pages.iter().map(String::len).sum::<usize>(),
            "PDF text extracted"
        );
        Ok(PdfText { pages })
    }
}

/// Test fixtures shared by extraction and API tests.
#[cfg(test)]
pub(crate) mod fixtures {
    /// Build a PDF with one text line per page using lopdf.
    pub fn make_test_pdf(page_texts: &[&str]) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
            let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::make_test_pdf;
    use super::*;

    #[test]
    fn extracts_text_from_digital_pdf() {
        let pdf = make_test_pdf(&["Chief Complaint: chest pain"]);
        let extracted = PdfTextExtractor.extract_text(&pdf).unwrap();
        assert_eq!(extracted.page_count(), 1);
        assert!(
            extracted.text().contains("chest pain"),
            "got: {:?}",
            extracted.text()
        );
    }

    #[test]
    fn counts_every_page() {
        let pdf = make_test_pdf(&["Page one", "Page two", "Page three"]);
        let extracted = PdfTextExtractor.extract_text(&pdf).unwrap();
        assert_eq!(extracted.page_count(), 3);
        assert!(extracted.text().contains("Page two"));
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        let err = PdfTextExtractor.extract_text(b"not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::PdfParsing(_)));
    }
}
