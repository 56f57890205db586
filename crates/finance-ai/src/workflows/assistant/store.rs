use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{ChatMessage, ChatSessionSummary};

const TITLE_LIMIT: usize = 40;
const UNTITLED: &str = "New Chat";

/// Persistence seam for chat transcripts keyed by chat id.
pub trait ChatStore: Send + Sync {
    fn append(&self, chat_id: &str, message: ChatMessage) -> Result<(), ChatStoreError>;
    fn history(&self, chat_id: &str) -> Result<Option<Vec<ChatMessage>>, ChatStoreError>;
    fn sessions(&self) -> Result<Vec<ChatSessionSummary>, ChatStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ChatStoreError {
    #[error("chat store unavailable: {0}")]
    Unavailable(String),
    #[error("chat store file {path} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("chat store file {path} is not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Session title: the first message trimmed to forty characters.
pub fn session_title(messages: &[ChatMessage]) -> String {
    messages
        .first()
        .map(|message| message.content.chars().take(TITLE_LIMIT).collect())
        .unwrap_or_else(|| UNTITLED.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredChat {
    chat_id: String,
    messages: Vec<ChatMessage>,
}

fn push_message(chats: &mut Vec<StoredChat>, chat_id: &str, message: ChatMessage) {
    match chats.iter_mut().find(|chat| chat.chat_id == chat_id) {
        Some(chat) => chat.messages.push(message),
        None => chats.push(StoredChat {
            chat_id: chat_id.to_string(),
            messages: vec![message],
        }),
    }
}

fn find_history(chats: &[StoredChat], chat_id: &str) -> Option<Vec<ChatMessage>> {
    chats
        .iter()
        .find(|chat| chat.chat_id == chat_id)
        .map(|chat| chat.messages.clone())
}

fn summarize(chats: &[StoredChat]) -> Vec<ChatSessionSummary> {
    chats
        .iter()
        .map(|chat| ChatSessionSummary {
            chat_id: chat.chat_id.clone(),
            title: session_title(&chat.messages),
        })
        .collect()
}

/// Process-local store that keeps sessions in creation order.
#[derive(Default, Clone)]
pub struct InMemoryChatStore {
    chats: Arc<Mutex<Vec<StoredChat>>>,
}

impl ChatStore for InMemoryChatStore {
    fn append(&self, chat_id: &str, message: ChatMessage) -> Result<(), ChatStoreError> {
        let mut guard = self.chats.lock().expect("chat store mutex poisoned");
        push_message(&mut guard, chat_id, message);
        Ok(())
    }

    fn history(&self, chat_id: &str) -> Result<Option<Vec<ChatMessage>>, ChatStoreError> {
        let guard = self.chats.lock().expect("chat store mutex poisoned");
        Ok(find_history(&guard, chat_id))
    }

    fn sessions(&self) -> Result<Vec<ChatSessionSummary>, ChatStoreError> {
        let guard = self.chats.lock().expect("chat store mutex poisoned");
        Ok(summarize(&guard))
    }
}

/// Store backed by a JSON file that is rewritten after every append, so chats survive restarts.
pub struct JsonFileChatStore {
    path: PathBuf,
    chats: Mutex<Vec<StoredChat>>,
}

impl JsonFileChatStore {
    /// Load `path` if it exists; a missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ChatStoreError> {
        let path = path.into();
        let chats = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
                ChatStoreError::Malformed {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(ChatStoreError::Io { path, source }),
        };

        info!(path = %path.display(), chats = chats.len(), "chat store opened");
        Ok(Self {
            path,
            chats: Mutex::new(chats),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write to a sibling temp file, then rename over the store.
    fn persist(&self, chats: &[StoredChat]) -> Result<(), ChatStoreError> {
        let io_error = |source| ChatStoreError::Io {
            path: self.path.clone(),
            source,
        };
        let payload = serde_json::to_vec_pretty(chats).map_err(|source| {
            ChatStoreError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload).map_err(io_error)?;
        fs::rename(&staging, &self.path).map_err(io_error)?;
        debug!(path = %self.path.display(), chats = chats.len(), "chat store persisted");
        Ok(())
    }
}

impl ChatStore for JsonFileChatStore {
    fn append(&self, chat_id: &str, message: ChatMessage) -> Result<(), ChatStoreError> {
        let mut guard = self.chats.lock().expect("chat store mutex poisoned");
        let mut next = guard.clone();
        push_message(&mut next, chat_id, message);
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn history(&self, chat_id: &str) -> Result<Option<Vec<ChatMessage>>, ChatStoreError> {
        let guard = self.chats.lock().expect("chat store mutex poisoned");
        Ok(find_history(&guard, chat_id))
    }

    fn sessions(&self) -> Result<Vec<ChatSessionSummary>, ChatStoreError> {
        let guard = self.chats.lock().expect("chat store mutex poisoned");
        Ok(summarize(&guard))
    }
}
