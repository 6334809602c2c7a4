//! Axum route handlers for the Screening API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    Json,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::errors::AppError;
use crate::screening::models::{ExperienceLevel, JobDetails, Language, ScreeningResult};
use crate::screening::service::{run_screening, ScreeningInput};
use crate::screening::source::ResumeSource;
use crate::state::AppState;

const PDF_CONTENT_TYPE: &str = "application/pdf";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SimulateRequest {
    pub job_title: String,
    pub job_description: Option<String>,
    pub experience_level: ExperienceLevel,
    pub resume_text: String,
    #[serde(default)]
    pub language: Language,
}

/// Fields collected from a multipart upload before validation.
#[derive(Debug, Default)]
struct UploadForm {
    resume: Option<UploadedFile>,
    job_title: Option<String>,
    job_description: Option<String>,
    experience_level: Option<String>,
    language: Option<String>,
}

#[derive(Debug)]
struct UploadedFile {
    content_type: Option<String>,
    data: Bytes,
}

impl UploadForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match name.as_str() {
                "resume" => {
                    let content_type = field.content_type().map(str::to_owned);
                    let data = field.bytes().await.map_err(multipart_error)?;
                    form.resume = Some(UploadedFile { content_type, data });
                }
                "jobTitle" => form.job_title = Some(field.text().await.map_err(multipart_error)?),
                "jobDescription" => {
                    form.job_description = Some(field.text().await.map_err(multipart_error)?)
                }
                "experienceLevel" => {
                    form.experience_level = Some(field.text().await.map_err(multipart_error)?)
                }
                "language" => form.language = Some(field.text().await.map_err(multipart_error)?),
                _ => {}
            }
        }

        Ok(form)
    }

    fn into_input(self) -> Result<ScreeningInput, AppError> {
        let file = self
            .resume
            .ok_or_else(|| AppError::InvalidInput("PDF file is required".to_string()))?;
        if file.content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
            return Err(AppError::InvalidInput("File must be a PDF".to_string()));
        }

        let job_title = self
            .job_title
            .ok_or_else(|| AppError::InvalidInput("jobTitle is required".to_string()))?;

        let experience_level = self
            .experience_level
            .ok_or_else(|| AppError::InvalidInput("experienceLevel is required".to_string()))
            .and_then(|raw| ExperienceLevel::try_from(raw).map_err(AppError::InvalidInput))?;

        let language = match self.language.filter(|l| !l.trim().is_empty()) {
            Some(raw) => Language::try_from(raw).map_err(AppError::InvalidInput)?,
            None => Language::default(),
        };

        let job = JobDetails::new(
            &job_title,
            self.job_description.as_deref(),
            experience_level,
            language,
        )?;

        Ok(ScreeningInput {
            job,
            resume: ResumeSource::Pdf(file.data),
        })
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::InvalidInput(format!("Invalid upload: {}", err.body_text()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /simulate
///
/// Screens résumé text sent directly in the JSON body.
pub async fn handle_simulate(
    State(state): State<AppState>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<ScreeningResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let job = JobDetails::new(
        &request.job_title,
        request.job_description.as_deref(),
        request.experience_level,
        request.language,
    )?;

    let input = ScreeningInput {
        job,
        resume: ResumeSource::Text(request.resume_text),
    };

    let result = run_screening(
        &state.llm,
        state.extractor.as_ref(),
        &state.config.screening,
        input,
    )
    .await?;

    Ok(Json(result))
}

/// POST /simulate/upload
///
/// Screens a PDF résumé uploaded as the `resume` part of a multipart form.
pub async fn handle_simulate_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScreeningResult>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let input = UploadForm::read(&mut multipart).await?.into_input()?;

    let result = run_screening(
        &state.llm,
        state.extractor.as_ref(),
        &state.config.screening,
        input,
    )
    .await?;

    Ok(Json(result))
}
