use axum::Json;
use serde_json::{json, Value};

/// GET /
pub async fn root_handler() -> &'static str {
    "AI Recruiter Simulator API is running"
}

/// GET /health
/// Returns a status object with service name, version and current time.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "ai-recruiter-simulator",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
