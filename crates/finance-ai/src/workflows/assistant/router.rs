use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::ChatRequest;
use super::service::{AssistantChatService, ChatServiceError};
use super::store::ChatStore;

/// Router exposing the offline assistant's chat and history endpoints.
pub fn assistant_router<S>(service: Arc<AssistantChatService<S>>) -> Router
where
    S: ChatStore + ?Sized + 'static,
{
    Router::new()
        .route("/assistant/chat", post(chat_handler::<S>))
        .route("/assistant/sessions", get(sessions_handler::<S>))
        .route("/assistant/history/:chat_id", get(history_handler::<S>))
        .with_state(service)
}

fn error_response(error: ChatServiceError) -> Response {
    let status = match error {
        ChatServiceError::EmptyMessage => StatusCode::UNPROCESSABLE_ENTITY,
        ChatServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

pub(crate) async fn chat_handler<S>(
    State(service): State<Arc<AssistantChatService<S>>>,
    Json(request): Json<ChatRequest>,
) -> Response
where
    S: ChatStore + ?Sized + 'static,
{
    match service.respond(request) {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn sessions_handler<S>(
    State(service): State<Arc<AssistantChatService<S>>>,
) -> Response
where
    S: ChatStore + ?Sized + 'static,
{
    match service.sessions() {
        Ok(sessions) => (StatusCode::OK, Json(sessions)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<S>(
    State(service): State<Arc<AssistantChatService<S>>>,
    Path(chat_id): Path<String>,
) -> Response
where
    S: ChatStore + ?Sized + 'static,
{
    match service.history(&chat_id) {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(error) => error_response(error),
    }
}
