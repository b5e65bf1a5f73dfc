//! Reference dataset of structured reports with gold summaries.
//!
//! Layout: `<dir>/<split>/<split>_data.json`, one JSON record per line:
//! `{"documents": [{"section": "...", "text": "..."}], "summary": "..."}`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pipeline::preprocess::SectionName;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    #[error("Data file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSplit {
    Train,
    Test,
    Validation,
}

impl DatasetSplit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Test => "test",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for DatasetSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetSplit {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Self::Train),
            "test" => Ok(Self::Test),
            "validation" => Ok(Self::Validation),
            other => Err(DatasetError::InvalidSplit(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportDocument {
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub text: String,
}

/// One dataset record as stored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportRecord {
    #[serde(default)]
    pub documents: Vec<ReportDocument>,
    #[serde(default)]
    pub summary: String,
}

impl ReportRecord {
    /// Text of the first document whose title matches `section`
    /// (case-insensitive), or empty.
    pub fn section_text(&self, section: SectionName) -> &str {
        let wanted = section.cue();
        self.documents
            .iter()
            .find(|doc| doc.section.trim().to_lowercase() == wanted)
            .map(|doc| doc.text.as_str())
            .unwrap_or("")
    }
}

/// A record mapped onto the five report sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormattedReport {
    pub chief_complaint: String,
    pub history_of_present_illness: String,
    pub physical_exam: String,
    pub diagnosis: String,
    pub treatment: String,
    pub summary: String,
}

pub fn format_report(record: &ReportRecord) -> FormattedReport {
    let text = |section| record.section_text(section).to_string();
    FormattedReport {
        chief_complaint: text(SectionName::ChiefComplaint),
        history_of_present_illness: text(SectionName::HistoryOfPresentIllness),
        physical_exam: text(SectionName::PhysicalExam),
        diagnosis: text(SectionName::Diagnosis),
        treatment: text(SectionName::Treatment),
        summary: record.summary.clone(),
    }
}

pub struct DatasetLoader {
    dataset_dir: PathBuf,
}

impl DatasetLoader {
    pub fn new(dataset_dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset_dir: dataset_dir.into(),
        }
    }

    pub fn split_path(&self, split: DatasetSplit) -> PathBuf {
        self.dataset_dir
            .join(split.as_str())
            .join(format!("{split}_data.json"))
    }

    /// Read every record of a split. Blank lines are skipped.
    pub fn load_reports(&self, split: DatasetSplit) -> Result<Vec<ReportRecord>, DatasetError> {
        let path = self.split_path(split);
        if !path.exists() {
            return Err(DatasetError::NotFound(path));
        }
        let records = parse_json_lines(&std::fs::read_to_string(&path)?)?;
        tracing::info!(split = %split, records = records.len(), "Dataset split loaded");
        Ok(records)
    }

    pub fn load_formatted_reports(
        &self,
        split: DatasetSplit,
    ) -> Result<Vec<FormattedReport>, DatasetError> {
        Ok(self.load_reports(split)?.iter().map(format_report).collect())
    }

    pub fn dataset_dir(&self) -> &Path {
        &self.dataset_dir
    }
}

fn parse_json_lines(content: &str) -> Result<Vec<ReportRecord>, DatasetError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| DatasetError::Parse { line: i + 1, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{"documents":[{"section":"Chief Complaint","text":"Chest pain."},{"section":" diagnosis ","text":"Acute MI."},{"section":"Social History","text":"Smoker."}],"summary":"45M with MI."}"#;

    fn write_split(dir: &Path, split: &str, content: &str) {
        let split_dir = dir.join(split);
        std::fs::create_dir_all(&split_dir).unwrap();
        std::fs::write(split_dir.join(format!("{split}_data.json")), content).unwrap();
    }

    #[test]
    fn loads_json_lines_split() {
        let dir = tempfile::tempdir().unwrap();
        write_split(dir.path(), "train", &format!("{RECORD}\n\n{RECORD}\n"));

        let loader = DatasetLoader::new(dir.path());
        let records = loader.load_reports(DatasetSplit::Train).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].documents.len(), 3);
    }

    #[test]
    fn formats_record_into_sections() {
        let record: ReportRecord = serde_json::from_str(RECORD).unwrap();
        let report = format_report(&record);
        assert_eq!(report.chief_complaint, "Chest pain.");
        assert_eq!(report.diagnosis, "Acute MI.");
        assert_eq!(report.physical_exam, "");
        assert_eq!(report.summary, "45M with MI.");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let record: ReportRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(format_report(&record), FormattedReport::default());
    }

    #[test]
    fn unknown_split_is_rejected() {
        let err = "dev".parse::<DatasetSplit>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid split: dev");
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DatasetLoader::new(dir.path());
        let err = loader.load_reports(DatasetSplit::Validation).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(ref p) if p.ends_with("validation/validation_data.json")));
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        write_split(dir.path(), "test", &format!("{RECORD}\nnot json\n"));

        let loader = DatasetLoader::new(dir.path());
        let err = loader.load_formatted_reports(DatasetSplit::Test).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { line: 2, .. }));
    }
}
