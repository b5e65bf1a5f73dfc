use std::sync::LazyLock;

use regex::Regex;

use super::types::DiagnosisResult;

pub const DIAGNOSIS_HEADER: &str = "## Potential Diagnoses (from most to least likely):";

pub const DIAGNOSIS_DISCLAIMER: &str = "*Note: This is an AI-generated assessment and should be \
reviewed by a qualified healthcare professional.*";

pub const NO_DIAGNOSIS_MESSAGE: &str =
    "No specific diagnosis could be determined from the provided information.";

/// Label used when a generative reply has no numbered list.
pub const FALLBACK_ASSESSMENT_LABEL: &str = "Clinical Assessment";

/// `1. text` or `1) text`
static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)[.)]\s+(.+)$").unwrap());

/// Human-readable classifier label: drop a leading `LABEL_`, split on `_`,
/// capitalize each word (first letter upper, rest lower).
pub fn humanize_label(label: &str) -> String {
    let stripped = label.strip_prefix("LABEL_").unwrap_or(label);
    stripped
        .split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Render ranked results as Markdown, keeping the model's order.
/// Scored entries get humanized labels and a one-decimal percentage.
pub fn format_diagnoses(diagnoses: &[DiagnosisResult]) -> String {
    if diagnoses.is_empty() {
        return NO_DIAGNOSIS_MESSAGE.to_string();
    }

    let mut lines = vec![format!("{DIAGNOSIS_HEADER}\n")];
    for (i, dx) in diagnoses.iter().enumerate() {
        // Free-text labels from generative models are already readable.
        let line = match (dx.confidence, dx.reasoning.as_deref()) {
            (Some(score), _) => format!(
                "{}. **{}** (Confidence: {:.1}%)",
                i + 1,
                humanize_label(&dx.label),
                score * 100.0
            ),
            (None, Some(reasoning)) if !reasoning.is_empty() => {
                format!("{}. **{}**: {}", i + 1, dx.label, reasoning)
            }
            (None, _) => format!("{}. **{}**", i + 1, dx.label),
        };
        lines.push(line);
    }
    lines.push(format!("\n{DIAGNOSIS_DISCLAIMER}"));
    lines.join("\n")
}

/// Parse a generative model's numbered-list reply into ranked entries.
///
/// Each numbered line becomes one entry; Markdown bold markers are removed
/// and the line is split into label and reasoning at the first `:` or
/// ` - `. A reply without any numbered line becomes a single
/// "Clinical Assessment" entry carrying the whole reply.
pub fn parse_generative_diagnoses(reply: &str) -> Vec<DiagnosisResult> {
    let entries: Vec<DiagnosisResult> = reply
        .lines()
        .filter_map(|line| NUMBERED_ITEM.captures(line))
        .filter_map(|caps| caps.get(2).map(|m| m.as_str().replace("**", "")))
        .filter_map(|item| split_label_reasoning(&item))
        .collect();

    if !entries.is_empty() {
        return entries;
    }

    let trimmed = reply.trim();
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![DiagnosisResult::reasoned(
            FALLBACK_ASSESSMENT_LABEL,
            Some(trimmed),
        )]
    }
}

fn split_label_reasoning(item: &str) -> Option<DiagnosisResult> {
    let item = item.trim();
    let split_at = [item.find(':'), item.find(" - ")]
        .into_iter()
        .flatten()
        .min();

    let (label, reasoning) = match split_at {
        Some(idx) => {
            let sep_len = if item[idx..].starts_with(':') { 1 } else { 3 };
            (item[..idx].trim(), item[idx + sep_len..].trim())
        }
        None => (item, ""),
    };

    if label.is_empty() {
        return None;
    }
    let reasoning = (!reasoning.is_empty()).then_some(reasoning);
    Some(DiagnosisResult::reasoned(label, reasoning))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanizes_classifier_labels() {
        assert_eq!(
            humanize_label("LABEL_acute_myocardial_infarction"),
            "Acute Myocardial Infarction"
        );
        assert_eq!(humanize_label("unstable_ANGINA"), "Unstable Angina");
        assert_eq!(humanize_label("LABEL_"), "");
        assert_eq!(humanize_label("pneumonia"), "Pneumonia");
    }

    #[test]
    fn formats_scored_diagnoses() {
        let formatted = format_diagnoses(&[
            DiagnosisResult::scored("LABEL_acute_myocardial_infarction", 0.873),
            DiagnosisResult::scored("LABEL_unstable_angina", 0.05),
        ]);
        assert_eq!(
            formatted,
            "## Potential Diagnoses (from most to least likely):\n\n\
             1. **Acute Myocardial Infarction** (Confidence: 87.3%)\n\
             2. **Unstable Angina** (Confidence: 5.0%)\n\n\
             *Note: This is an AI-generated assessment and should be reviewed by a qualified healthcare professional.*"
        );
    }

    #[test]
    fn keeps_model_order() {
        let formatted = format_diagnoses(&[
            DiagnosisResult::scored("b_low", 0.1),
            DiagnosisResult::scored("a_high", 0.9),
        ]);
        assert!(formatted.find("B Low").unwrap() < formatted.find("A High").unwrap());
    }

    #[test]
    fn empty_result_message() {
        assert_eq!(format_diagnoses(&[]), NO_DIAGNOSIS_MESSAGE);
    }

    #[test]
    fn formats_generative_entries() {
        let formatted = format_diagnoses(&[
            DiagnosisResult::reasoned("Acute MI", Some("ST elevation with chest pain")),
            DiagnosisResult::reasoned("Pericarditis", None),
        ]);
        assert!(formatted.contains("1. **Acute MI**: ST elevation with chest pain"));
        assert!(formatted.contains("2. **Pericarditis**\n"));
    }

    #[test]
    fn parses_numbered_reply() {
        let reply = "Here are the possibilities:\n\
                     1. **Acute myocardial infarction**: substernal pain radiating to the arm\n\
                     2) Unstable angina - pain at rest\n\
                     3. Aortic dissection\n\
                     Please consult a physician.";
        let parsed = parse_generative_diagnoses(reply);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].label, "Acute myocardial infarction");
        assert_eq!(
            parsed[0].reasoning.as_deref(),
            Some("substernal pain radiating to the arm")
        );
        assert_eq!(parsed[1].label, "Unstable angina");
        assert_eq!(parsed[1].reasoning.as_deref(), Some("pain at rest"));
        assert_eq!(parsed[2].label, "Aortic dissection");
        assert!(parsed[2].reasoning.is_none());
        assert!(parsed.iter().all(|d| d.confidence.is_none()));
    }

    #[test]
    fn unnumbered_reply_becomes_single_assessment() {
        let parsed = parse_generative_diagnoses("Likely cardiac ischemia.");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].label, FALLBACK_ASSESSMENT_LABEL);
        assert_eq!(parsed[0].reasoning.as_deref(), Some("Likely cardiac ischemia."));
    }

    #[test]
    fn blank_reply_parses_to_nothing() {
        assert!(parse_generative_diagnoses("  \n ").is_empty());
    }
}
