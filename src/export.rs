//! Plain-text export of summaries and diagnoses.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Summary,
    Diagnosis,
}

impl ExportKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Summary => "medical_summary.txt",
            Self::Diagnosis => "medical_diagnosis.txt",
        }
    }
}

/// Write `content` for download. A directory target receives the default
/// file name; any other path is written as given.
pub fn write_export(kind: ExportKind, content: &str, target: &Path) -> std::io::Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(kind.file_name())
    } else {
        target.to_path_buf()
    };
    std::fs::write(&path, content)?;
    tracing::info!(path = %path.display(), kind = ?kind, "Export written");
    Ok(path)
}
