use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::domain::{ChatMessage, ChatReply, ChatRequest, ChatSessionSummary};
use super::intent::detect_intent;
use super::store::{ChatStore, ChatStoreError};

/// Conversational backend reached for every non-greeting message.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatBackendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ChatBackendError {
    #[error("chat backend unavailable: {0}")]
    Unavailable(String),
    #[error("chat backend rejected the request: {0}")]
    Rejected(String),
}

/// Offline assistant: keyword intents answered from canned copy and the risk engine.
pub struct AssistantChatService<S: ?Sized> {
    store: Arc<S>,
}

impl<S> AssistantChatService<S>
where
    S: ChatStore + ?Sized + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Record the user message, answer it, and record the answer under the same chat id.
    pub fn respond(&self, request: ChatRequest) -> Result<ChatReply, ChatServiceError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(ChatServiceError::EmptyMessage);
        }

        let chat_id = request
            .chat_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.store
            .append(&chat_id, ChatMessage::user(request.message.clone()))?;

        let intent = detect_intent(message);
        let reply = intent.reply();
        debug!(%chat_id, ?intent, "assistant reply prepared");

        self.store
            .append(&chat_id, ChatMessage::assistant(reply.clone()))?;

        Ok(ChatReply { chat_id, reply })
    }

    pub fn sessions(&self) -> Result<Vec<ChatSessionSummary>, ChatServiceError> {
        Ok(self.store.sessions()?)
    }

    /// Transcript for a chat; unknown ids yield an empty history.
    pub fn history(&self, chat_id: &str) -> Result<Vec<ChatMessage>, ChatServiceError> {
        Ok(self.store.history(chat_id)?.unwrap_or_default())
    }

    pub fn record_upload(&self, chat_id: &str, file_name: &str) -> Result<(), ChatServiceError> {
        self.store.append(
            chat_id,
            ChatMessage::system(format!("Document uploaded: {file_name}")),
        )?;
        Ok(())
    }
}

#[async_trait]
impl<S> ChatBackend for AssistantChatService<S>
where
    S: ChatStore + ?Sized + 'static,
{
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatBackendError> {
        self.respond(request).map_err(|err| match err {
            ChatServiceError::EmptyMessage => ChatBackendError::Rejected(err.to_string()),
            ChatServiceError::Store(_) => ChatBackendError::Unavailable(err.to_string()),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error("message must not be empty")]
    EmptyMessage,
    #[error(transparent)]
    Store(#[from] ChatStoreError),
}
