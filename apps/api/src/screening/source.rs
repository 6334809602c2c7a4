//! Text Source Adapter — resolves the résumé text for a screening, either from
//! text sent directly or from an uploaded PDF.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::config::ScreeningSettings;

/// Every PDF starts with this signature.
const PDF_SIGNATURE: &[u8; 4] = b"%PDF";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("resumeText cannot be empty")]
    EmptyText,

    #[error("File is not a valid PDF")]
    InvalidFormat,

    #[error("File is too large. Maximum size: {max_mib}MB")]
    PayloadTooLarge { max_mib: usize },

    #[error("PDF does not contain enough text for analysis (minimum {min_chars} characters)")]
    InsufficientContent { min_chars: usize },

    #[error("Failed to process PDF. Check that the file is valid and contains text: {0}")]
    Extraction(String),
}

/// Where the résumé comes from.
#[derive(Debug, Clone)]
pub enum ResumeSource {
    Text(String),
    Pdf(Bytes),
}

/// Black-box PDF text extraction. Swap implementations without touching the adapter.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, pdf: Bytes) -> Result<String, SourceError>;
}

/// `pdf-extract` backed extractor. Parsing is CPU-bound, so it runs on the
/// blocking pool; a panic inside the parser is reported as an extraction error.
pub struct PdfExtractor;

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, pdf: Bytes) -> Result<String, SourceError> {
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
            .await
            .map_err(|e| SourceError::Extraction(e.to_string()))?
            .map_err(|e| SourceError::Extraction(e.to_string()))
    }
}

/// Produces usable résumé text from the given source.
pub async fn resolve_resume_text(
    source: ResumeSource,
    extractor: &dyn TextExtractor,
    settings: &ScreeningSettings,
) -> Result<String, SourceError> {
    match source {
        ResumeSource::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(SourceError::EmptyText);
            }
            Ok(text.to_string())
        }
        ResumeSource::Pdf(pdf) => extract_pdf_text(pdf, extractor, settings).await,
    }
}

async fn extract_pdf_text(
    pdf: Bytes,
    extractor: &dyn TextExtractor,
    settings: &ScreeningSettings,
) -> Result<String, SourceError> {
    if pdf.len() > settings.max_pdf_bytes {
        return Err(SourceError::PayloadTooLarge {
            max_mib: settings.max_pdf_bytes / (1024 * 1024),
        });
    }

    if !pdf.starts_with(PDF_SIGNATURE) {
        return Err(SourceError::InvalidFormat);
    }

    info!(
        "Extracting text from PDF ({:.2}KB)",
        pdf.len() as f64 / 1024.0
    );

    let text = extractor.extract(pdf).await?;
    let text = text.trim();

    let char_count = text.chars().count();
    if char_count < settings.min_resume_chars {
        return Err(SourceError::InsufficientContent {
            min_chars: settings.min_resume_chars,
        });
    }

    info!("Text extracted successfully ({char_count} characters)");
    Ok(text.to_string())
}
