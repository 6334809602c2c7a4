//! Prompt Builder — renders the screening instruction for the model.
//!
//! Pure and deterministic: the same request always renders the same bytes.
//! Résumé text is embedded verbatim; it is not escaped or sanitized.

use crate::screening::models::{Decision, Language, ScreeningRequest};

/// Language-specific fragments of the screening prompt. Keys of the JSON
/// schema are shared; everything a human reads is localized.
struct PromptText {
    language_directive: &'static str,
    role: &'static str,
    task: &'static str,
    job_header: &'static str,
    title_label: &'static str,
    description_label: &'static str,
    level_label: &'static str,
    resume_header: &'static str,
    schema_intro: &'static str,
    score_type: &'static str,
    closing: &'static str,
}

const PT_BR: PromptText = PromptText {
    language_directive: "IMPORTANTE: Responda em Português do Brasil. Todo o texto, justificativas, \
        sugestões e avaliações devem estar em Português do Brasil. Mantenha os nomes das chaves \
        do JSON exatamente como no modelo.",
    role: "Você é um sistema de triagem de currículos que simula:\n\
        1) Um ATS\n\
        2) Um recrutador técnico\n\
        3) Um recrutador de RH",
    task: "Avalie o currículo abaixo para a vaga informada.",
    job_header: "Vaga:",
    title_label: "Título",
    description_label: "Descrição",
    level_label: "Nível esperado",
    resume_header: "Currículo:",
    schema_intro: "Gere a resposta em JSON com a seguinte estrutura:",
    score_type: "número (0-100)",
    closing: "Seja realista, objetivo e profissional.\nNão elogie excessivamente.",
};

const EN: PromptText = PromptText {
    language_directive: "IMPORTANT: Respond in English. All text, justifications, suggestions, \
        and evaluations must be in English. Keep the JSON key names exactly as in the template.",
    role: "You are a resume screening system that simulates:\n\
        1) An ATS\n\
        2) A technical recruiter\n\
        3) An HR recruiter",
    task: "Evaluate the resume below for the given job opening.",
    job_header: "Job:",
    title_label: "Title",
    description_label: "Description",
    level_label: "Expected level",
    resume_header: "Resume:",
    schema_intro: "Generate the response as JSON with the following structure:",
    score_type: "number (0-100)",
    closing: "Be realistic, objective, and professional.\nDo not over-praise.",
};

fn prompt_text(language: Language) -> &'static PromptText {
    match language {
        Language::PtBr => &PT_BR,
        Language::En => &EN,
    }
}

/// Decision tokens offered to the model, e.g. `AVANÇA | TALVEZ | REPROVA`.
pub fn decision_choices(language: Language) -> String {
    Decision::vocabulary(language).join(" | ")
}

fn response_schema(text: &PromptText, language: Language) -> String {
    format!(
        r#"{{
  "atsScore": {score_type},
  "atsAnalysis": {{
    "keywordsMatched": [],
    "keywordsMissing": []
  }},
  "technicalEvaluation": {{
    "strengths": [],
    "risks": [],
    "perceivedSeniority": ""
  }},
  "hrEvaluation": {{
    "communication": "",
    "clarity": "",
    "redFlags": []
  }},
  "finalDecision": {{
    "decision": "{decisions}",
    "justification": ""
  }},
  "resumeSuggestions": []
}}"#,
        score_type = text.score_type,
        decisions = decision_choices(language),
    )
}

/// Renders the user prompt for one screening.
pub fn build_prompt(request: &ScreeningRequest) -> String {
    let job = &request.job;
    let text = prompt_text(job.language);

    let mut job_lines = vec![
        text.job_header.to_string(),
        format!("{}: {}", text.title_label, job.title),
    ];
    if let Some(description) = &job.description {
        job_lines.push(format!("{}: {}", text.description_label, description));
    }
    job_lines.push(format!(
        "{}: {}",
        text.level_label,
        job.experience_level.label(job.language)
    ));

    [
        text.language_directive.to_string(),
        text.role.to_string(),
        text.task.to_string(),
        job_lines.join("\n"),
        format!("{}\n{}", text.resume_header, request.resume_text),
        format!(
            "{}\n\n{}",
            text.schema_intro,
            response_schema(text, job.language)
        ),
        text.closing.to_string(),
    ]
    .join("\n\n")
}
