// System prompts sent alongside every screening prompt.
// One per supported output language; both demand JSON-only output.

use crate::screening::models::Language;

pub const SYSTEM_PT_BR: &str = "Você é um assistente especializado em análise de currículos. \
    Sempre retorne respostas válidas em JSON. \
    Responda em Português do Brasil.";

pub const SYSTEM_EN: &str = "You are an assistant specialized in resume analysis. \
    Always return valid JSON responses. \
    Respond in English.";

pub fn system_prompt(language: Language) -> &'static str {
    match language {
        Language::PtBr => SYSTEM_PT_BR,
        Language::En => SYSTEM_EN,
    }
}
