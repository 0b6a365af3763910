//! Test utilities for glimpse-core
//!
//! This module provides a mock Gemini server that speaks just enough of the
//! `generateContent` API for integration tests and local development.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// API key the mock server accepts
pub const MOCK_API_KEY: &str = "test-key";

/// What the mock server answers to `generateContent`
#[derive(Debug, Clone)]
pub enum MockGeminiReply {
    /// Reply with this text as the first candidate part
    Text(String),
    /// Reply 200 with no candidates
    NoCandidates,
    /// Reply with this HTTP status and an error body
    Status(u16),
    /// Reply 200 with a body that is not JSON
    Malformed,
}

#[derive(Clone)]
struct ServerState {
    replies: Arc<Mutex<Vec<MockGeminiReply>>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// Mock Gemini server for testing and development
pub struct MockGeminiServer {
    addr: SocketAddr,
    state: ServerState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start the mock server on an available port
    ///
    /// Replies are served in order; the last one repeats.
    pub async fn start(replies: Vec<MockGeminiReply>) -> Self {
        let state = ServerState {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route(
                "/v1beta/models/:model",
                get(handle_model).post(handle_generate),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request bodies received by `generateContent`, in order
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Deserialize)]
struct KeyQuery {
    key: Option<String>,
}

fn unauthorized() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": {"code": 400, "message": "API key not valid."}})),
    )
        .into_response()
}

/// Model metadata endpoint (health check)
async fn handle_model(Path(model): Path<String>, Query(query): Query<KeyQuery>) -> Response {
    if query.key.as_deref() != Some(MOCK_API_KEY) {
        return unauthorized();
    }
    Json(json!({"name": format!("models/{}", model)})).into_response()
}

/// `POST /v1beta/models/{model}:generateContent`
async fn handle_generate(
    State(state): State<ServerState>,
    Path(model_action): Path<String>,
    Query(query): Query<KeyQuery>,
    Json(body): Json<Value>,
) -> Response {
    if !model_action.ends_with(":generateContent") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if query.key.as_deref() != Some(MOCK_API_KEY) {
        return unauthorized();
    }

    state.requests.lock().unwrap().push(body);

    let reply = {
        let mut replies = state.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.remove(0)
        } else {
            replies
                .first()
                .cloned()
                .unwrap_or(MockGeminiReply::NoCandidates)
        }
    };

    match reply {
        MockGeminiReply::Text(text) => Json(json!({
            "candidates": [{
                "content": {"parts": [{"text": text}], "role": "model"},
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
        MockGeminiReply::NoCandidates => Json(json!({"candidates": []})).into_response(),
        MockGeminiReply::Malformed => {
            (StatusCode::OK, "<html>upstream proxy error</html>").into_response()
        }
        MockGeminiReply::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(json!({"error": {"code": code, "message": "mock failure"}})),
            )
                .into_response()
        }
    }
}
