//! Screening Orchestrator — runs one screening end to end.
//!
//! Flow: resolve résumé text → build prompt → one completion call →
//!       validate reply → return result.
//!
//! Strictly sequential, no shared mutable state, no retries. Any failure
//! discards the whole invocation.

use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::config::ScreeningSettings;
use crate::errors::AppError;
use crate::llm_client::{prompts::system_prompt, LlmClient};
use crate::screening::models::{JobDetails, ScreeningRequest, ScreeningResult};
use crate::screening::prompts::build_prompt;
use crate::screening::source::{resolve_resume_text, ResumeSource, TextExtractor};
use crate::screening::validator::validate_completion;

/// Everything a caller hands in for one screening.
#[derive(Debug, Clone)]
pub struct ScreeningInput {
    pub job: JobDetails,
    pub resume: ResumeSource,
}

/// Runs the screening pipeline and logs its outcome.
pub async fn run_screening(
    llm: &LlmClient,
    extractor: &dyn TextExtractor,
    settings: &ScreeningSettings,
    input: ScreeningInput,
) -> Result<ScreeningResult, AppError> {
    let span = tracing::info_span!("screening", screening_id = %Uuid::new_v4());

    async move {
        info!(
            "Starting screening for job: {} ({}) [{}]",
            input.job.title,
            input.job.experience_level.label(input.job.language),
            input.job.language.code()
        );

        match screen(llm, extractor, settings, input).await {
            Ok(result) => {
                info!(
                    "Screening completed. ATS score: {}, decision: {}",
                    result.ats_score,
                    result.decision_label()
                );
                Ok(result)
            }
            Err(e) => {
                error!("Screening failed: {e}");
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}

async fn screen(
    llm: &LlmClient,
    extractor: &dyn TextExtractor,
    settings: &ScreeningSettings,
    input: ScreeningInput,
) -> Result<ScreeningResult, AppError> {
    let resume_text = resolve_resume_text(input.resume, extractor, settings).await?;

    let request = ScreeningRequest {
        job: input.job,
        resume_text,
    };

    let prompt = build_prompt(&request);
    let completion = llm
        .complete(&prompt, system_prompt(request.job.language))
        .await?;

    let result = validate_completion(&completion, request.job.language, settings.validation)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmSettings;
    use crate::screening::models::{Decision, ExperienceLevel, Language};
    use crate::screening::source::PdfExtractor;
    use crate::test_support::{mock_provider, ProviderReply};
    use std::time::Duration;

    const REACT_RESUME: &str = "Desenvolvedora frontend com 4 anos de experiência em React, \
        TypeScript e Redux. Construiu design systems, migrou aplicações legadas para Next.js \
        e escreveu testes com Jest e Testing Library em equipes ágeis.";

    const TALVEZ_REPLY: &str = r#"{
        "atsScore": 75,
        "atsAnalysis": {"keywordsMatched": ["React", "TypeScript"], "keywordsMissing": ["AWS"]},
        "technicalEvaluation": {"strengths": ["React"], "risks": ["Pouco backend"], "perceivedSeniority": "Pleno"},
        "hrEvaluation": {"communication": "Adequada", "clarity": "Boa", "redFlags": []},
        "finalDecision": {"decision": "TALVEZ", "justification": "Boa base, faltam detalhes de cloud."},
        "resumeSuggestions": ["Quantificar resultados"]
    }"#;

    fn llm_for(url: String, api_key: Option<&str>) -> LlmClient {
        LlmClient::new(LlmSettings {
            api_url: url,
            api_key: api_key.map(String::from),
            model: "gpt-4o-mini".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn frontend_input(language: Language) -> ScreeningInput {
        ScreeningInput {
            job: JobDetails::new("Frontend Developer", None, ExperienceLevel::Mid, language)
                .unwrap(),
            resume: ResumeSource::Text(REACT_RESUME.into()),
        }
    }

    #[tokio::test]
    async fn test_well_formed_reply_is_returned_unchanged() {
        let provider = mock_provider(ProviderReply::content(TALVEZ_REPLY)).await;
        let llm = llm_for(provider.url(), Some("sk-test"));

        let result = run_screening(
            &llm,
            &PdfExtractor,
            &ScreeningSettings::default(),
            frontend_input(Language::PtBr),
        )
        .await
        .unwrap();

        assert_eq!(result.ats_score.as_i64(), Some(75));
        let decision = result.final_decision.typed().unwrap().decision;
        assert_eq!(decision.decision, Decision::Maybe);

        let expected: serde_json::Value = serde_json::from_str(TALVEZ_REPLY).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), expected);

        let seen = provider.last_request().await.unwrap();
        let prompt = seen.body["messages"][1]["content"].as_str().unwrap();
        assert!(prompt.contains("Título: Frontend Developer"));
        assert!(prompt.contains("Nível esperado: Pleno"));
        assert!(prompt.contains(REACT_RESUME));
        assert!(seen.body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("Português do Brasil"));
    }

    #[tokio::test]
    async fn test_english_screening_uses_english_system_prompt() {
        let reply = TALVEZ_REPLY.replace("TALVEZ", "MAYBE");
        let provider = mock_provider(ProviderReply::content(&reply)).await;
        let llm = llm_for(provider.url(), Some("sk-test"));

        let result = run_screening(
            &llm,
            &PdfExtractor,
            &ScreeningSettings::default(),
            frontend_input(Language::En),
        )
        .await
        .unwrap();
        assert_eq!(result.decision_label(), "MAYBE");

        let seen = provider.last_request().await.unwrap();
        assert!(seen.body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("Respond in English"));
    }

    #[tokio::test]
    async fn test_provider_401_is_upstream_error_with_provider_message() {
        let provider = mock_provider(ProviderReply::raw(
            401,
            r#"{"error":{"message":"Incorrect API key provided: sk-bad."}}"#,
        ))
        .await;
        let llm = llm_for(provider.url(), Some("sk-bad"));

        let err = run_screening(
            &llm,
            &PdfExtractor,
            &ScreeningSettings::default(),
            frontend_input(Language::PtBr),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), axum::http::StatusCode::BAD_GATEWAY);
        match err {
            AppError::Upstream { message, timed_out } => {
                assert_eq!(message, "Incorrect API key provided: sk-bad.");
                assert!(!timed_out);
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_are_malformed_response() {
        let provider = mock_provider(ProviderReply::raw(200, r#"{"choices":[]}"#)).await;
        let llm = llm_for(provider.url(), Some("sk-test"));

        let err = run_screening(
            &llm,
            &PdfExtractor,
            &ScreeningSettings::default(),
            frontend_input(Language::PtBr),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_misconfigured() {
        let provider = mock_provider(ProviderReply::content(TALVEZ_REPLY)).await;
        let llm = llm_for(provider.url(), None);

        let err = run_screening(
            &llm,
            &PdfExtractor,
            &ScreeningSettings::default(),
            frontend_input(Language::PtBr),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Misconfigured(_)));
        assert!(provider.last_request().await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_pdf_never_reaches_provider() {
        let provider = mock_provider(ProviderReply::content(TALVEZ_REPLY)).await;
        let llm = llm_for(provider.url(), Some("sk-test"));

        let mut input = frontend_input(Language::PtBr);
        input.resume = ResumeSource::Pdf(bytes::Bytes::from_static(b"not a pdf at all"));

        let err = run_screening(&llm, &PdfExtractor, &ScreeningSettings::default(), input)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(provider.last_request().await.is_none());
    }

    #[tokio::test]
    async fn test_incomplete_reply_yields_no_result() {
        let mut reply: serde_json::Value = serde_json::from_str(TALVEZ_REPLY).unwrap();
        reply.as_object_mut().unwrap().remove("resumeSuggestions");
        let provider = mock_provider(ProviderReply::content(&reply.to_string())).await;
        let llm = llm_for(provider.url(), Some("sk-test"));

        let err = run_screening(
            &llm,
            &PdfExtractor,
            &ScreeningSettings::default(),
            frontend_input(Language::PtBr),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }
}
