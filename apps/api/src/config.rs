use std::time::Duration;

use anyhow::{Context, Result};

use crate::screening::validator::ValidationPolicy;

pub const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_PDF_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_MIN_RESUME_CHARS: usize = 50;

/// Application configuration loaded from environment variables.
/// Read once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmSettings,
    pub screening: ScreeningSettings,
    /// Allowed CORS origin. `None` means any origin.
    pub frontend_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

/// Everything the completion client needs to reach the provider.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_url: String,
    /// Missing key is not fatal at startup; each call fails with `Misconfigured`.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ScreeningSettings {
    pub max_pdf_bytes: usize,
    pub min_resume_chars: usize,
    pub validation: ValidationPolicy,
}

impl Default for ScreeningSettings {
    fn default() -> Self {
        Self {
            max_pdf_bytes: DEFAULT_MAX_PDF_BYTES,
            min_resume_chars: DEFAULT_MIN_RESUME_CHARS,
            validation: ValidationPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let validation = match get("SCREENING_VALIDATION") {
            Some(raw) => raw.parse::<ValidationPolicy>()?,
            None => ValidationPolicy::default(),
        };

        Ok(Config {
            llm: LlmSettings {
                api_url: get("LLM_API_URL").unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string()),
                api_key: get("LLM_API_KEY"),
                model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                timeout: Duration::from_secs(parse_or(
                    get("LLM_TIMEOUT_SECS"),
                    "LLM_TIMEOUT_SECS",
                    DEFAULT_LLM_TIMEOUT_SECS,
                )?),
            },
            screening: ScreeningSettings {
                max_pdf_bytes: parse_or(
                    get("MAX_PDF_BYTES"),
                    "MAX_PDF_BYTES",
                    DEFAULT_MAX_PDF_BYTES,
                )?,
                min_resume_chars: parse_or(
                    get("MIN_RESUME_CHARS"),
                    "MIN_RESUME_CHARS",
                    DEFAULT_MIN_RESUME_CHARS,
                )?,
                validation,
            },
            frontend_url: get("FRONTEND_URL"),
            port: parse_or(get("PORT"), "PORT", 3000u16)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => {
            let parsed = value
                .trim()
                .parse::<T>()
                .with_context(|| format!("{key} must be a valid number, got '{value}'"))?;
            Ok(parsed)
        }
        None => Ok(default),
    }
}
