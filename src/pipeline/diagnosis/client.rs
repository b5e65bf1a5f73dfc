use super::format::format_diagnoses;
use super::prompt::build_diagnosis_prompt;
use super::types::{Diagnosis, DiagnosisModel, DiagnosisOutcome, PatientInfo};
use super::DiagnosisError;

/// Runs one diagnosis action against a [`DiagnosisModel`].
pub struct DiagnosisClient<'a> {
    model: &'a dyn DiagnosisModel,
}

impl<'a> DiagnosisClient<'a> {
    pub fn new(model: &'a dyn DiagnosisModel) -> Self {
        Self { model }
    }

    /// Build the prompt, call the model, format the ranked result.
    /// Every error is caught and returned as [`DiagnosisOutcome::Failed`].
    pub fn generate_diagnosis(
        &self,
        text: &str,
        patient_info: Option<&PatientInfo>,
    ) -> DiagnosisOutcome {
        match self.try_generate(text, patient_info) {
            Ok(diagnosis) => DiagnosisOutcome::Success(diagnosis),
            Err(e) => {
                tracing::warn!(model = %self.model.model_id(), error = %e, "Diagnosis failed");
                DiagnosisOutcome::failed(e)
            }
        }
    }

    fn try_generate(
        &self,
        text: &str,
        patient_info: Option<&PatientInfo>,
    ) -> Result<Diagnosis, DiagnosisError> {
        if text.trim().is_empty() {
            return Err(DiagnosisError::EmptyInput);
        }

        let prompt = build_diagnosis_prompt(text, patient_info);
        tracing::debug!(
            model = %self.model.model_id(),
            prompt_len = prompt.len(),
            "Requesting diagnosis"
        );

        let diagnoses = self.model.diagnose(&prompt)?;
        tracing::info!(
            model = %self.model.model_id(),
            candidates = diagnoses.len(),
            "Diagnosis generated"
        );

        Ok(Diagnosis {
            model: self.model.model_id().to_string(),
            diagnosis: format_diagnoses(&diagnoses),
            diagnoses,
        })
    }
}
