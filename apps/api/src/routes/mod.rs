pub mod health;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::screening::handlers;
use crate::state::AppState;

/// Headroom above the PDF limit for the other form fields and multipart framing.
const UPLOAD_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.screening.max_pdf_bytes + UPLOAD_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/simulate", post(handlers::handle_simulate))
        .route(
            "/simulate/upload",
            post(handlers::handle_simulate_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}

/// Restricts CORS to `frontend_url` when configured; any origin otherwise.
pub fn cors_layer(frontend_url: Option<&str>) -> Result<CorsLayer> {
    let Some(origin) = frontend_url else {
        return Ok(CorsLayer::permissive());
    };

    let origin = origin
        .parse::<HeaderValue>()
        .with_context(|| format!("FRONTEND_URL is not a valid origin: '{origin}'"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}
