use super::types::PatientInfo;

/// Instruction for generative models; the reply format is what
/// [`super::format::parse_generative_diagnoses`] expects.
pub const GENERATIVE_SYSTEM_PROMPT: &str = "You are a clinical decision support assistant. \
Given patient information and clinical notes, list up to five possible diagnoses, \
most likely first, as a numbered list. Write each item as \
`N. Diagnosis name: one-sentence reasoning`. Do not add any other text.";

/// Fold patient metadata and clinical notes into one prompt.
///
/// Non-blank patient fields become `Label: value` lines (Age, Sex, Chief
/// Complaint, Medical History, Current Medications), followed by a blank
/// line, `Clinical Notes:` and the text. Without patient fields the prompt
/// is the text alone.
pub fn build_diagnosis_prompt(text: &str, patient_info: Option<&PatientInfo>) -> String {
    let fields = patient_info.map(PatientInfo::present_fields).unwrap_or_default();
    if fields.is_empty() {
        return text.to_string();
    }

    let mut lines: Vec<String> = fields
        .into_iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect();
    lines.push("\nClinical Notes:".to_string());
    lines.push(text.to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_fields_precede_clinical_notes() {
        let info = PatientInfo {
            age: Some("45".into()),
            sex: Some("Male".into()),
            ..PatientInfo::default()
        };
        let prompt = build_diagnosis_prompt("chest pain", Some(&info));
        assert_eq!(prompt, "Age: 45\nSex: Male\n\nClinical Notes:\nchest pain");

        let age = prompt.find("Age: 45").unwrap();
        let sex = prompt.find("Sex: Male").unwrap();
        let notes = prompt.find("Clinical Notes:").unwrap();
        assert!(age < sex && sex < notes);
        assert!(prompt.ends_with("chest pain"));
    }

    #[test]
    fn no_patient_info_means_text_only() {
        assert_eq!(build_diagnosis_prompt("chest pain", None), "chest pain");
        let blank = PatientInfo {
            age: Some(" ".into()),
            ..PatientInfo::default()
        };
        assert_eq!(build_diagnosis_prompt("chest pain", Some(&blank)), "chest pain");
    }

    #[test]
    fn all_fields_in_fixed_order() {
        let info = PatientInfo {
            current_medications: Some("Metformin".into()),
            medical_history: Some("Diabetes".into()),
            chief_complaint: Some("Chest pain".into()),
            sex: Some("F".into()),
            age: Some("60".into()),
        };
        let prompt = build_diagnosis_prompt("notes", Some(&info));
        assert_eq!(
            prompt,
            "Age: 60\nSex: F\nChief Complaint: Chest pain\nMedical History: Diabetes\n\
             Current Medications: Metformin\n\nClinical Notes:\nnotes"
        );
    }
}
