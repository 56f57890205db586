use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::DocumentId;
use super::ocr::OcrEngine;
use super::repository::DocumentRepository;
use super::service::{DocumentService, DocumentServiceError, Recalculation};

/// Listing, lookup and recalculation endpoints. Uploads are multipart and mounted by the API
/// service.
pub fn document_router<R, O>(service: Arc<DocumentService<R, O>>) -> Router
where
    R: DocumentRepository + 'static,
    O: OcrEngine + 'static,
{
    Router::new()
        .route("/documents/", get(list_handler::<R, O>))
        .route("/documents/:id", get(get_handler::<R, O>))
        .route("/documents/:id/recalculate", post(recalculate_handler::<R, O>))
        .with_state(service)
}

pub fn error_response(error: DocumentServiceError) -> Response {
    let status = match error {
        DocumentServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        DocumentServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

pub(crate) async fn list_handler<R, O>(
    State(service): State<Arc<DocumentService<R, O>>>,
) -> Response
where
    R: DocumentRepository + 'static,
    O: OcrEngine + 'static,
{
    match service.overview() {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, O>(
    State(service): State<Arc<DocumentService<R, O>>>,
    Path(id): Path<String>,
) -> Response
where
    R: DocumentRepository + 'static,
    O: OcrEngine + 'static,
{
    match service.get(&DocumentId(id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recalculate_handler<R, O>(
    State(service): State<Arc<DocumentService<R, O>>>,
    Path(id): Path<String>,
) -> Response
where
    R: DocumentRepository + 'static,
    O: OcrEngine + 'static,
{
    match service.recalculate(&DocumentId(id)) {
        Ok(Recalculation::Scheduled(record)) => (
            StatusCode::ACCEPTED,
            Json(json!({ "scheduled": true, "document": record })),
        )
            .into_response(),
        Ok(Recalculation::Ignored(record)) => (
            StatusCode::OK,
            Json(json!({ "scheduled": false, "document": record })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}
