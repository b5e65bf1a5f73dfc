//! Cue-based bucketing of report sentences into the five named sections.

use serde::{Deserialize, Serialize};

use super::sentences::split_sentences;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// The fixed set of report sections, in cue priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    ChiefComplaint,
    HistoryOfPresentIllness,
    PhysicalExam,
    Diagnosis,
    Treatment,
}

impl SectionName {
    /// All sections, in the order cues are tried.
    pub fn all() -> [SectionName; 5] {
        [
            Self::ChiefComplaint,
            Self::HistoryOfPresentIllness,
            Self::PhysicalExam,
            Self::Diagnosis,
            Self::Treatment,
        ]
    }

    /// Lowercase phrase that marks a sentence as belonging to this section.
    pub fn cue(&self) -> &'static str {
        match self {
            Self::ChiefComplaint => "chief complaint",
            Self::HistoryOfPresentIllness => "history of present illness",
            Self::PhysicalExam => "physical exam",
            Self::Diagnosis => "diagnosis",
            Self::Treatment => "treatment",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChiefComplaint => "chief_complaint",
            Self::HistoryOfPresentIllness => "history_of_present_illness",
            Self::PhysicalExam => "physical_exam",
            Self::Diagnosis => "diagnosis",
            Self::Treatment => "treatment",
        }
    }

    /// Title-cased label used when rendering section summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ChiefComplaint => "Chief Complaint",
            Self::HistoryOfPresentIllness => "History Of Present Illness",
            Self::PhysicalExam => "Physical Exam",
            Self::Diagnosis => "Diagnosis",
            Self::Treatment => "Treatment",
        }
    }

    /// Match a free-form section title ("Chief complaint", "physical_exam").
    pub fn from_title(title: &str) -> Option<Self> {
        let wanted = title.trim().to_lowercase().replace(['_', '-'], " ");
        Self::all().into_iter().find(|s| s.cue() == wanted)
    }
}

impl std::fmt::Display for SectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Section text keyed by the fixed section set. Empty string = no match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    pub chief_complaint: String,
    pub history_of_present_illness: String,
    pub physical_exam: String,
    pub diagnosis: String,
    pub treatment: String,
}

impl SectionMap {
    pub fn get(&self, name: SectionName) -> &str {
        match name {
            SectionName::ChiefComplaint => &self.chief_complaint,
            SectionName::HistoryOfPresentIllness => &self.history_of_present_illness,
            SectionName::PhysicalExam => &self.physical_exam,
            SectionName::Diagnosis => &self.diagnosis,
            SectionName::Treatment => &self.treatment,
        }
    }

    pub fn get_mut(&mut self, name: SectionName) -> &mut String {
        match name {
            SectionName::ChiefComplaint => &mut self.chief_complaint,
            SectionName::HistoryOfPresentIllness => &mut self.history_of_present_illness,
            SectionName::PhysicalExam => &mut self.physical_exam,
            SectionName::Diagnosis => &mut self.diagnosis,
            SectionName::Treatment => &mut self.treatment,
        }
    }

    /// Sections in priority order with their text.
    pub fn iter(&self) -> impl Iterator<Item = (SectionName, &str)> {
        SectionName::all().into_iter().map(move |name| (name, self.get(name)))
    }

    /// True when no section received any sentence.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, text)| text.is_empty())
    }
}

/// What to do when several sentences match the same section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionMatchPolicy {
    /// Join every matching sentence in document order with a single space.
    #[default]
    Concatenate,
    /// Keep the first matching sentence.
    FirstMatch,
    /// Keep the last matching sentence, overwriting earlier ones.
    LastMatch,
}

impl std::str::FromStr for SectionMatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "concatenate" | "all" => Ok(Self::Concatenate),
            "first_match" | "first" => Ok(Self::FirstMatch),
            "last_match" | "last" => Ok(Self::LastMatch),
            other => Err(format!("unknown section match policy '{other}'")),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Extractor
// ═══════════════════════════════════════════════════════════

/// Assign a sentence to the first section whose cue it contains.
pub fn classify_sentence(sentence: &str) -> Option<SectionName> {
    let lower = sentence.to_lowercase();
    SectionName::all()
        .into_iter()
        .find(|name| lower.contains(name.cue()))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SectionExtractor {
    policy: SectionMatchPolicy,
}

impl SectionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: SectionMatchPolicy) -> Self {
        Self { policy }
    }

    /// Bucket the sentences of `text` into sections. Sentences keep their
    /// original casing; sentences matching no cue are dropped.
    pub fn extract(&self, text: &str) -> SectionMap {
        let mut map = SectionMap::default();
        let mut matched = 0usize;

        for sentence in split_sentences(text) {
            let Some(name) = classify_sentence(sentence) else {
                continue;
            };
            matched += 1;
            let slot = map.get_mut(name);
            match self.policy {
                SectionMatchPolicy::Concatenate => {
                    if !slot.is_empty() {
                        slot.push(' ');
                    }
                    slot.push_str(sentence);
                }
                SectionMatchPolicy::FirstMatch => {
                    if slot.is_empty() {
                        slot.push_str(sentence);
                    }
                }
                SectionMatchPolicy::LastMatch => {
                    *slot = sentence.to_string();
                }
            }
        }

        tracing::debug!(
            matched_sentences = matched,
            policy = ?self.policy,
            "Sections extracted"
        );
        map
    }
}

/// Extract sections with the default policy.
pub fn extract_sections(text: &str) -> SectionMap {
    SectionExtractor::new().extract(text)
}
