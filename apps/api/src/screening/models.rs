//! Screening domain types: what goes into a screening and what comes back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Input
// ────────────────────────────────────────────────────────────────────────────

/// Output language of the screening. Drives every instruction in the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    #[default]
    PtBr,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::PtBr => "pt-br",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "pt-br" => Some(Language::PtBr),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

impl TryFrom<String> for Language {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Language::from_code(&value)
            .ok_or_else(|| format!("language must be 'pt-br' or 'en', got '{value}'"))
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

/// Seniority the role expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
}

impl ExperienceLevel {
    /// Label shown to the model, in the language of the screening.
    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (ExperienceLevel::Junior, Language::PtBr) => "Júnior",
            (ExperienceLevel::Mid, Language::PtBr) => "Pleno",
            (ExperienceLevel::Senior, Language::PtBr) => "Sênior",
            (ExperienceLevel::Junior, Language::En) => "Junior",
            (ExperienceLevel::Mid, Language::En) => "Mid",
            (ExperienceLevel::Senior, Language::En) => "Senior",
        }
    }

    /// Accepts both the Portuguese and the English labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Júnior" | "Junior" => Some(ExperienceLevel::Junior),
            "Pleno" | "Mid" => Some(ExperienceLevel::Mid),
            "Sênior" | "Senior" => Some(ExperienceLevel::Senior),
            _ => None,
        }
    }
}

impl TryFrom<String> for ExperienceLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ExperienceLevel::from_label(&value).ok_or_else(|| {
            format!(
                "experienceLevel must be one of Júnior, Pleno, Sênior, Junior, Mid, Senior, got '{value}'"
            )
        })
    }
}

impl From<ExperienceLevel> for String {
    fn from(level: ExperienceLevel) -> Self {
        level.label(Language::PtBr).to_string()
    }
}

/// The job side of a screening, validated. Résumé text is resolved separately.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDetails {
    pub title: String,
    pub description: Option<String>,
    pub experience_level: ExperienceLevel,
    pub language: Language,
}

impl JobDetails {
    /// Rejects a blank title and drops a blank description. Non-blank text is
    /// kept exactly as received.
    pub fn new(
        title: &str,
        description: Option<&str>,
        experience_level: ExperienceLevel,
        language: Language,
    ) -> Result<Self, AppError> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput("jobTitle cannot be empty".to_string()));
        }

        let description = description
            .filter(|d| !d.trim().is_empty())
            .map(String::from);

        Ok(Self {
            title: title.to_string(),
            description,
            experience_level,
            language,
        })
    }
}

/// One complete, immutable screening request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningRequest {
    pub job: JobDetails,
    pub resume_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

/// Final screening verdict. Its wire form is a localized token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Advance,
    Maybe,
    Reject,
}

impl Decision {
    pub const ALL: [Decision; 3] = [Decision::Advance, Decision::Maybe, Decision::Reject];

    pub fn token(self, language: Language) -> &'static str {
        match (self, language) {
            (Decision::Advance, Language::PtBr) => "AVANÇA",
            (Decision::Maybe, Language::PtBr) => "TALVEZ",
            (Decision::Reject, Language::PtBr) => "REPROVA",
            (Decision::Advance, Language::En) => "PASS",
            (Decision::Maybe, Language::En) => "MAYBE",
            (Decision::Reject, Language::En) => "REJECT",
        }
    }

    /// The tokens the prompt offers the model for `language`, in order.
    pub fn vocabulary(language: Language) -> [&'static str; 3] {
        Decision::ALL.map(|d| d.token(language))
    }

    /// Exact-match lookup across every supported language.
    pub fn from_token(token: &str) -> Option<LocalizedDecision> {
        [Language::PtBr, Language::En].into_iter().find_map(|language| {
            Decision::ALL
                .into_iter()
                .find(|d| d.token(language) == token)
                .map(|decision| LocalizedDecision { decision, language })
        })
    }
}

/// A decision together with the language its token was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocalizedDecision {
    pub decision: Decision,
    pub language: Language,
}

impl LocalizedDecision {
    pub fn token(self) -> &'static str {
        self.decision.token(self.language)
    }
}

impl TryFrom<String> for LocalizedDecision {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Decision::from_token(&value).ok_or_else(|| format!("unknown decision token '{value}'"))
    }
}

impl From<LocalizedDecision> for String {
    fn from(decision: LocalizedDecision) -> Self {
        decision.token().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsAnalysis {
    pub keywords_matched: Vec<String>,
    pub keywords_missing: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalEvaluation {
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
    pub perceived_seniority: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrEvaluation {
    pub communication: String,
    pub clarity: String,
    pub red_flags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalDecision {
    pub decision: LocalizedDecision,
    pub justification: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A nested section of the model's reply.
///
/// `Typed` when the section matches the declared schema, `Opaque` when it is
/// present but shaped differently. Opaque sections are passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section<T> {
    Typed(T),
    Opaque(Value),
}

impl<T> Section<T> {
    #[allow(dead_code)]
    pub fn typed(&self) -> Option<&T> {
        match self {
            Section::Typed(value) => Some(value),
            Section::Opaque(_) => None,
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, Section::Typed(_))
    }
}

/// The screening verdict returned to callers.
///
/// Only `screening::validator` produces one, after the reply passed validation.
/// Keys outside the declared schema are carried in `extra`, so the result
/// serializes back to the object the model sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningResult {
    /// Reported as the model sent it: no clamping, no rounding.
    pub ats_score: serde_json::Number,
    pub ats_analysis: Section<AtsAnalysis>,
    pub technical_evaluation: Section<TechnicalEvaluation>,
    pub hr_evaluation: Section<HrEvaluation>,
    pub final_decision: Section<FinalDecision>,
    pub resume_suggestions: Section<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScreeningResult {
    /// Names of the sections that did not match the declared schema.
    pub fn opaque_sections(&self) -> Vec<&'static str> {
        let sections = [
            ("atsAnalysis", self.ats_analysis.is_typed()),
            ("technicalEvaluation", self.technical_evaluation.is_typed()),
            ("hrEvaluation", self.hr_evaluation.is_typed()),
            ("finalDecision", self.final_decision.is_typed()),
            ("resumeSuggestions", self.resume_suggestions.is_typed()),
        ];
        sections
            .into_iter()
            .filter(|(_, typed)| !typed)
            .map(|(name, _)| name)
            .collect()
    }

    /// Decision text for logging, whether or not the section was typed.
    pub fn decision_label(&self) -> String {
        match &self.final_decision {
            Section::Typed(fd) => fd.decision.token().to_string(),
            Section::Opaque(value) => value
                .get("decision")
                .and_then(|d| d.as_str())
                .unwrap_or("?")
                .to_string(),
        }
    }
}
