//! Exclusive access to the model backends.
//!
//! Hosted inference endpoints and a local Ollama instance both degrade
//! badly under concurrent requests from the same process. Every
//! summarization or diagnosis acquires [`ModelService`] for its whole
//! duration; `current_operation()` reports what is running.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// What kind of model operation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Chunked summary of a whole report
    ReportSummarization,
    /// Per-section summaries
    SectionSummarization,
    /// Candidate diagnoses
    Diagnosis,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReportSummarization => write!(f, "Report summarization"),
            Self::SectionSummarization => write!(f, "Section summarization"),
            Self::Diagnosis => write!(f, "Diagnosis"),
        }
    }
}

/// Snapshot of the running operation.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveOperation {
    pub kind: OperationKind,
    pub model: String,
    /// RFC 3339 start time.
    pub started_at: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelServiceError {
    #[error("Internal lock error")]
    LockPoisoned,
}

// ═══════════════════════════════════════════════════════════
// ModelService
// ═══════════════════════════════════════════════════════════

pub struct ModelService {
    lock: Mutex<()>,
    current_op: Mutex<Option<ActiveOperation>>,
}

impl ModelService {
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            current_op: Mutex::new(None),
        }
    }

    /// Block until the backends are free, then mark `kind` as running.
    /// The operation ends when the returned guard is dropped.
    pub fn acquire(
        &self,
        kind: OperationKind,
        model: &str,
    ) -> Result<ModelGuard<'_>, ModelServiceError> {
        let guard = self.lock.lock().map_err(|_| ModelServiceError::LockPoisoned)?;
        self.set_current_op(kind, model);
        tracing::debug!(%kind, model, "Model access acquired");
        Ok(ModelGuard {
            _guard: guard,
            service: self,
        })
    }

    /// Non-blocking variant of [`acquire`](Self::acquire); `None` when busy.
    pub fn try_acquire(&self, kind: OperationKind, model: &str) -> Option<ModelGuard<'_>> {
        let guard = self.lock.try_lock().ok()?;
        self.set_current_op(kind, model);
        Some(ModelGuard {
            _guard: guard,
            service: self,
        })
    }

    /// `None` when idle.
    pub fn current_operation(&self) -> Option<ActiveOperation> {
        self.current_op.lock().ok()?.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    fn set_current_op(&self, kind: OperationKind, model: &str) {
        if let Ok(mut current) = self.current_op.lock() {
            *current = Some(ActiveOperation {
                kind,
                model: model.to_string(),
                started_at: chrono::Utc::now().to_rfc3339(),
            });
        }
    }

    fn clear_current_op(&self) {
        if let Ok(mut current) = self.current_op.lock() {
            *current = None;
        }
    }
}

impl Default for ModelService {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII token for exclusive model access.
pub struct ModelGuard<'a> {
    _guard: MutexGuard<'a, ()>,
    service: &'a ModelService,
}

impl Drop for ModelGuard<'_> {
    fn drop(&mut self) {
        self.service.clear_current_op();
    }
}
