//! Test helpers: an in-process chat-completion provider and a canned PDF extractor.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use bytes::Bytes;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::screening::source::{SourceError, TextExtractor};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// What the mock provider answers with.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

impl ProviderReply {
    /// A 200 response whose first choice carries `content`.
    pub fn content(content: &str) -> Self {
        let body = json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        });
        Self::raw(200, &body.to_string())
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request the mock provider received.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct ProviderState {
    reply: ProviderReply,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

pub struct MockProvider {
    addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockProvider {
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, COMPLETIONS_PATH)
    }

    pub async fn last_request(&self) -> Option<SeenRequest> {
        self.seen.lock().await.last().cloned()
    }
}

async fn handle_completion(
    State(state): State<ProviderState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.seen.lock().await.push(SeenRequest {
        authorization,
        body,
    });

    if let Some(delay) = state.reply.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(state.reply.status).unwrap();
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        state.reply.body.clone(),
    )
        .into_response()
}

/// Starts a provider on an ephemeral localhost port that always answers `reply`.
pub async fn mock_provider(reply: ProviderReply) -> MockProvider {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route(COMPLETIONS_PATH, post(handle_completion))
        .with_state(ProviderState {
            reply,
            seen: seen.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockProvider { addr, seen }
}

/// Returns canned text and counts how often it was asked.
pub struct StubExtractor {
    text: String,
    calls: AtomicUsize,
}

impl StubExtractor {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextExtractor for StubExtractor {
    async fn extract(&self, _pdf: Bytes) -> Result<String, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}
