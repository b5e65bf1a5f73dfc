//! Sample report PDF for trying the pipeline end to end.

use std::io::BufWriter;

use printpdf::*;

#[derive(Debug, thiserror::Error)]
pub enum SamplePdfError {
    #[error("PDF font error: {0}")]
    Font(String),
    #[error("PDF save error: {0}")]
    Save(String),
}

const SAMPLE_REPORT: &str = "\
Patient Information:
Name: John Smith
Age: 45
Sex: Male
Date: May 20, 2025

Chief Complaint:
Patient presents with chest pain and shortness of breath for the past 24 hours. Pain is described as substernal, crushing, and radiates to the left arm. Associated symptoms include diaphoresis and nausea.

History of Present Illness:
The patient is a 45-year-old male who presents with sudden onset chest pain that started yesterday evening. The pain is described as substernal, crushing in nature, and radiates to the left arm. He also reports diaphoresis and nausea. The pain is not relieved by rest or nitroglycerin. He denies any recent travel or exposure to sick contacts.

Physical Examination:
Vital Signs:
- Temperature: 98.6 F
- Blood Pressure: 140/90 mmHg
- Heart Rate: 110 bpm
- Respiratory Rate: 20 breaths/min
- Oxygen Saturation: 95% on room air
Cardiovascular:
- Regular rate and rhythm
- No murmurs, gallops, or rubs
Respiratory:
- Clear to auscultation bilaterally

Diagnosis:
Acute myocardial infarction

Treatment:
- Aspirin 325 mg chewed
- Nitroglycerin 0.4 mg sublingual
- Oxygen 2L by nasal cannula
- EKG shows ST-segment elevation in leads II, III, and aVF
- Troponin I elevated at 5.2 ng/mL
- Patient transferred to cath lab for emergent PCI";

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const BOTTOM_MARGIN: Mm = Mm(15.0);
const LINE_HEIGHT: Mm = Mm(4.2);
const WRAP_CHARS: usize = 100;

/// Plain text of the sample report.
pub fn sample_report_text() -> &'static str {
    SAMPLE_REPORT
}

/// Render the sample report as a PDF. Returns PDF bytes.
pub fn generate_sample_report_pdf() -> Result<Vec<u8>, SamplePdfError> {
    let (doc, page1, layer1) =
        PdfDocument::new("Sample Medical Report", PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let mut layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| SamplePdfError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| SamplePdfError::Font(e.to_string()))?;

    layer.use_text("Medical Report", 12.0, Mm(88.0), Mm(282.0), &bold);
    let mut y = Mm(270.0);

    for line in SAMPLE_REPORT.lines() {
        for wrapped in wrap_text(line, WRAP_CHARS) {
            if y < BOTTOM_MARGIN {
                let (page, page_layer) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                y = Mm(282.0);
            }
            let face = if wrapped.ends_with(':') { &bold } else { &font };
            layer.use_text(&wrapped, 9.0, Mm(20.0), y, face);
            y -= LINE_HEIGHT;
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| SamplePdfError::Save(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| SamplePdfError::Save(e.to_string()))
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
