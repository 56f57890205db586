//! Scripted loan assistant: greeting dispatcher, offline chat backend, and the per-user
//! session that drives the automation simulation.

pub mod domain;
pub mod greeting;
mod intent;
pub mod router;
pub mod service;
pub mod session;
pub mod store;
pub mod voice;

#[cfg(test)]
mod tests;

pub use domain::{
    ChatMessage, ChatReply, ChatRequest, ChatRole, ChatSessionSummary, LoanType, UiMarker,
    UnknownLoanType,
};
pub use greeting::{is_greeting, FALLBACK_REPLY, GREETING_REPLY, GREETING_TOKENS};
pub use intent::{detect_intent, Intent};
pub use router::assistant_router;
pub use service::{AssistantChatService, ChatBackend, ChatBackendError, ChatServiceError};
pub use session::{AssistantSession, AutomationStart, DispatchOutcome, SkipReason};
pub use store::{ChatStore, ChatStoreError, InMemoryChatStore, JsonFileChatStore};
pub use voice::{SpeechToText, VoiceInputError};
