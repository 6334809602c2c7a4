use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::screening::source::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Pluggable PDF text extraction. Default: `PdfExtractor` (pdf-extract).
    pub extractor: Arc<dyn TextExtractor>,
    pub config: Config,
}
