/// Collapse every run of whitespace (newlines included) to a single space
/// and trim both ends. Casing is preserved.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize extracted report text: newline and whitespace runs become a
/// single space, then everything is lowercased.
///
/// Lossy by nature. Callers that still need the original casing must keep
/// the raw string around.
pub fn normalize_text(text: &str) -> String {
    let normalized = collapse_whitespace(text).to_lowercase();
    tracing::debug!(
        original_len = text.len(),
        normalized_len = normalized.len(),
        "Report text normalized"
    );
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_newlines_and_spaces() {
        let raw = "Chief Complaint:\n\n65-year-old   male\twith chest pain\r\n";
        assert_eq!(
            normalize_text(raw),
            "chief complaint: 65-year-old male with chest pain"
        );
    }

    #[test]
    fn lowercases_everything() {
        assert_eq!(normalize_text("BP 140/90 mmHg, HR 95"), "bp 140/90 mmhg, hr 95");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n\t "), "");
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let samples = [
            "Patient presents with SUBSTERNAL chest pain.\n\nNo history of similar episodes.",
            "  Aspirin 325 mg,   Nitroglycerin 0.4 mg SL  ",
            "Résultat: ÉLEVÉ, protéine µg/L",
            "",
        ];
        for sample in samples {
            let once = normalize_text(sample);
            assert_eq!(normalize_text(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn collapse_keeps_casing() {
        assert_eq!(collapse_whitespace("  Acute\n\nMI  "), "Acute MI");
    }
}
