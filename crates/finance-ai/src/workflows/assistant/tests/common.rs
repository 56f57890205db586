use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::config::SimulationConfig;
use crate::workflows::assistant::domain::{ChatReply, ChatRequest};
use crate::workflows::assistant::service::{ChatBackend, ChatBackendError};
use crate::workflows::assistant::session::AssistantSession;
use crate::workflows::assistant::voice::{SpeechToText, VoiceInputError};
use crate::workflows::assistant::{AssistantChatService, InMemoryChatStore};

#[derive(Default)]
pub(super) struct StubBackend {
    requests: Mutex<Vec<ChatRequest>>,
}

impl StubBackend {
    pub(super) fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().expect("stub mutex poisoned").clone()
    }
}

#[async_trait]
impl ChatBackend for StubBackend {
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatBackendError> {
        let reply = format!("echo: {}", request.message);
        self.requests
            .lock()
            .expect("stub mutex poisoned")
            .push(request);
        Ok(ChatReply {
            chat_id: "chat-1".to_string(),
            reply,
        })
    }
}

pub(super) struct OfflineBackend;

#[async_trait]
impl ChatBackend for OfflineBackend {
    async fn send(&self, _request: ChatRequest) -> Result<ChatReply, ChatBackendError> {
        Err(ChatBackendError::Unavailable("connection refused".to_string()))
    }
}

pub(super) struct FixedTranscript(pub(super) &'static str);

impl SpeechToText for FixedTranscript {
    fn recognize(&self, language: &str) -> Result<String, VoiceInputError> {
        assert_eq!(language, "en-IN");
        Ok(self.0.to_string())
    }
}

pub(super) fn session_with(backend: Arc<dyn ChatBackend>) -> AssistantSession {
    AssistantSession::new(backend, SimulationConfig::default())
}

pub(super) fn zero_delays() -> SimulationConfig {
    SimulationConfig {
        step_interval: Duration::ZERO,
        step_typing_delay: Duration::ZERO,
        summary_typing_delay: Duration::ZERO,
        reply_typing_delay: Duration::ZERO,
        upload_ocr_delay: Duration::ZERO,
        recalculate_delay: Duration::ZERO,
    }
}

/// Wait on the real clock until every queued reply has landed.
pub(super) async fn settle(session: &AssistantSession) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while session.is_typing() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("replies settle");
}

pub(super) fn stub_session() -> (AssistantSession, Arc<StubBackend>) {
    let backend = Arc::new(StubBackend::default());
    (session_with(backend.clone()), backend)
}

pub(super) fn chat_service() -> (AssistantChatService<InMemoryChatStore>, Arc<InMemoryChatStore>) {
    let store = Arc::new(InMemoryChatStore::default());
    (AssistantChatService::new(store.clone()), store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
