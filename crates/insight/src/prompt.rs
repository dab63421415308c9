//! Prompt rendering.

use crate::excerpt::PatientClinicalExcerpt;

const PROMPT_HEADER: &str = "Here is de-identified patient information:";

const PROMPT_INSTRUCTIONS: &str = "Please provide:\n\
\n\
1. General interpretation of this data (clinical significance).\n\
2. General next steps a healthcare professional might consider.\n\
\n\
Keep the details concise so doctors can read quickly and provide their judgment.";

/// Render the prompt sent to the analysis service.
///
/// Deterministic: the same excerpt always renders the same text. The birth date is rendered as
/// an age on the excerpt's capture date rather than verbatim.
pub fn render_prompt(excerpt: &PatientClinicalExcerpt) -> String {
    let age = excerpt
        .age_years()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".into());
    let gender = if excerpt.gender().is_empty() {
        "unknown"
    } else {
        excerpt.gender()
    };

    let lines = [
        PROMPT_HEADER.to_string(),
        format!("- Age: {}", age),
        format!("- Gender: {}", gender),
        format!("- Medical Conditions: {}", join_or_none(excerpt.conditions())),
        format!("- Hemoglobin Level: {} g/dL", excerpt.hemoglobin_g_dl()),
        format!("- Current Medications: {}", join_or_none(excerpt.medications())),
        format!("- Glucose Level: {} mg/dL", excerpt.glucose_mg_dl()),
        String::new(),
        PROMPT_INSTRUCTIONS.to_string(),
    ];

    lines.join("\n")
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".into()
    } else {
        items.join(", ")
    }
}
