//! Response Validator — turns untrusted completion text into a `ScreeningResult`.
//!
//! Two phases:
//! 1. Structural check on the raw JSON value: the top-level keys must exist
//!    with the right primitive kind.
//! 2. Typed deserialization. Each nested section becomes `Section::Typed` when
//!    it matches the declared schema, `Section::Opaque` otherwise.
//!
//! What happens to opaque sections, and to a decision token from the other
//! language's vocabulary, is decided by `ValidationPolicy`.
//! Failure is all-or-nothing; there is no partial result and no repair.

use serde_json::Value;
use thiserror::Error;

use crate::screening::models::{Language, ScreeningResult, Section};

/// Required top-level object sections, in schema order.
const OBJECT_SECTIONS: [&str; 4] = [
    "atsAnalysis",
    "technicalEvaluation",
    "hrEvaluation",
    "finalDecision",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Top-level keys are checked strictly; nested shapes are trusted.
    #[default]
    Shallow,
    /// Every nested section must also match the declared schema, and the
    /// decision must use the vocabulary of the request language.
    Strict,
}

impl std::str::FromStr for ValidationPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shallow" => Ok(ValidationPolicy::Shallow),
            "strict" => Ok(ValidationPolicy::Strict),
            other => {
                anyhow::bail!("SCREENING_VALIDATION must be 'shallow' or 'strict', got '{other}'")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("sections do not match the schema: {}", .0.join(", "))]
    SchemaMismatch(Vec<&'static str>),

    #[error("decision '{token}' is not one of the {expected} decision tokens")]
    ForeignDecision {
        token: &'static str,
        expected: &'static str,
    },
}

/// Strips Markdown code fences the model may wrap its JSON in.
///
/// Every ```json / ``` marker is removed wherever it appears, then the
/// result is trimmed.
pub fn strip_json_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Checks the top-level shape of a parsed reply.
fn check_structure(value: &Value) -> Result<(), ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

    match object.get("atsScore") {
        None => return Err(ValidationError::MissingField("atsScore")),
        Some(score) if !score.is_number() => {
            return Err(ValidationError::WrongType {
                field: "atsScore",
                expected: "a number",
            })
        }
        Some(_) => {}
    }

    for field in OBJECT_SECTIONS {
        match object.get(field) {
            None => return Err(ValidationError::MissingField(field)),
            Some(section) if !section.is_object() => {
                return Err(ValidationError::WrongType {
                    field,
                    expected: "an object",
                })
            }
            Some(_) => {}
        }
    }

    match object.get("resumeSuggestions") {
        None => Err(ValidationError::MissingField("resumeSuggestions")),
        Some(suggestions) if !suggestions.is_array() => Err(ValidationError::WrongType {
            field: "resumeSuggestions",
            expected: "an array",
        }),
        Some(_) => Ok(()),
    }
}

/// Validates raw completion text and produces the screening result.
///
/// `language` is the language the prompt was written in.
pub fn validate_completion(
    raw: &str,
    language: Language,
    policy: ValidationPolicy,
) -> Result<ScreeningResult, ValidationError> {
    let cleaned = strip_json_fences(raw);
    let value: Value = serde_json::from_str(&cleaned)?;

    check_structure(&value)?;

    let result: ScreeningResult = serde_json::from_value(value)?;

    if policy == ValidationPolicy::Strict {
        let opaque = result.opaque_sections();
        if !opaque.is_empty() {
            return Err(ValidationError::SchemaMismatch(opaque));
        }

        if let Section::Typed(final_decision) = &result.final_decision {
            if final_decision.decision.language != language {
                return Err(ValidationError::ForeignDecision {
                    token: final_decision.decision.token(),
                    expected: language.code(),
                });
            }
        }
    }

    Ok(result)
}
