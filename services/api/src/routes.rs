use crate::infra::{AppState, Chat, Documents, Services};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use finance_ai::workflows::assistant::assistant_router;
use finance_ai::workflows::documents::router::error_response as document_error_response;
use finance_ai::workflows::documents::{document_router, DocumentUpload, DocumentUploadReceipt};
use finance_ai::workflows::export::export_router;
use finance_ai::workflows::portfolio::portfolio_router;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

pub(crate) fn build_router(services: Services) -> Router {
    let uploads = Router::new()
        .route("/documents/upload", post(upload_document))
        .with_state(services.documents.clone());
    let chat_uploads = Router::new()
        .route("/assistant/upload/:chat_id", post(upload_to_chat))
        .with_state(services.chat.clone());

    portfolio_router()
        .merge(document_router(services.documents))
        .merge(uploads)
        .merge(assistant_router(services.chat))
        .merge(chat_uploads)
        .merge(export_router())
        .route("/", get(root))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/ws/dashboard", get(dashboard_socket))
}

pub(crate) async fn root() -> Json<Value> {
    Json(json!({
        "message": "Finance AI Backend Running",
        "modules": [
            "Dashboard",
            "Leads",
            "Pipeline",
            "Documents",
            "Risk",
            "AI Assistant",
            "MIS Export",
            "WebSocket Live Dashboard",
        ],
    }))
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "finance-ai-backend" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
        .into_response()
}

/// Uploaded file name plus any text fields sent alongside it.
#[derive(Debug, Default)]
struct UploadForm {
    file_name: Option<String>,
    content_type: Option<String>,
    size: usize,
    customer_id: Option<String>,
    customer_name: Option<String>,
    document_type: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, Response> {
    let mut form = UploadForm::default();
    let field_error = |err: axum::extract::multipart::MultipartError| bad_request(err.body_text());

    while let Some(field) = multipart.next_field().await.map_err(field_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string).or_else(|| {
                    file_name.as_deref().map(|name| {
                        mime_guess::from_path(name)
                            .first_or_octet_stream()
                            .to_string()
                    })
                });
                let bytes = field.bytes().await.map_err(field_error)?;
                form.file_name = file_name;
                form.content_type = content_type;
                form.size = bytes.len();
            }
            "customer_id" => form.customer_id = Some(field.text().await.map_err(field_error)?),
            "customer_name" => form.customer_name = Some(field.text().await.map_err(field_error)?),
            "type" => form.document_type = Some(field.text().await.map_err(field_error)?),
            other => debug!(field = other, "ignoring unexpected upload field"),
        }
    }

    Ok(form)
}

pub(crate) async fn upload_document(
    State(documents): State<Arc<Documents>>,
    multipart: Multipart,
) -> Response {
    let form = match read_upload_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let Some(file_name) = form.file_name else {
        return bad_request("file field is required");
    };
    info!(file = %file_name, bytes = form.size, "document upload received");

    let upload = DocumentUpload {
        file_name,
        customer_id: form.customer_id,
        customer_name: form.customer_name,
        document_type: form.document_type,
        content_type: form.content_type,
    };
    match documents.upload(upload) {
        Ok(record) => (StatusCode::OK, Json(DocumentUploadReceipt::new(record))).into_response(),
        Err(error) => document_error_response(error),
    }
}

pub(crate) async fn upload_to_chat(
    State(chat): State<Arc<Chat>>,
    Path(chat_id): Path<String>,
    multipart: Multipart,
) -> Response {
    let form = match read_upload_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let Some(file_name) = form.file_name else {
        return bad_request("file field is required");
    };

    match chat.record_upload(&chat_id, &file_name) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Document uploaded", "file": file_name })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn dashboard_socket(
    ws: WebSocketUpgrade,
    Extension(state): Extension<AppState>,
) -> Response {
    let patches = state.live_feed.subscribe();
    ws.on_upgrade(move |socket| stream_patches(socket, patches))
}

async fn stream_patches(mut socket: WebSocket, mut patches: broadcast::Receiver<Value>) {
    loop {
        match patches.recv().await {
            Ok(patch) => {
                if socket.send(Message::Text(patch.to_string())).await.is_err() {
                    debug!("dashboard subscriber disconnected");
                    return;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "dropping lagging dashboard subscriber");
                return;
            }
            Err(RecvError::Closed) => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use finance_ai::config::{LiveFeedConfig, SimulationConfig};
    use finance_ai::workflows::assistant::InMemoryChatStore;
    use finance_ai::workflows::documents::{InMemoryDocumentRepository, SimulatedOcr};
    use finance_ai::workflows::portfolio::LiveFeed;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    const BOUNDARY: &str = "finance-ai-boundary";

    fn services() -> Services {
        Services {
            documents: Arc::new(Documents::new(
                Arc::new(InMemoryDocumentRepository::seeded()),
                Arc::new(SimulatedOcr),
                SimulationConfig::default(),
            )),
            chat: Arc::new(Chat::new(Arc::new(InMemoryChatStore::default()))),
        }
    }

    fn app(services: Services, ready: bool) -> Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            live_feed: LiveFeed::new(LiveFeedConfig::default()),
        };
        build_router(services).layer(Extension(state))
    }

    fn multipart_body(fields: &[(&str, &str)], file: Option<&str>) -> Body {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        if let Some(file) = file {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file}\"\r\n\r\nscanned-bytes\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Body::from(body)
    }

    fn multipart_request(uri: &str, body: Body) -> Request<Body> {
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(body)
            .expect("request builds")
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(services(), false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(services(), true)
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(read_json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn upload_applies_defaults_and_starts_pending() {
        let services = services();
        let router = app(services.clone(), true);

        let response = router
            .oneshot(multipart_request(
                "/documents/upload",
                multipart_body(&[("type", "Salary Slip")], Some("salary.pdf")),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["message"], "Uploaded successfully. OCR processing started.");
        assert_eq!(body["document"]["name"], "salary.pdf");
        assert_eq!(body["document"]["type"], "Salary Slip");
        assert_eq!(body["document"]["customer_name"], "Unknown Customer");
        assert_eq!(body["document"]["status"], "Pending");
        assert_eq!(
            body["document"]["customer_id"].as_str().map(str::len),
            Some(6)
        );
        assert_eq!(services.documents.stats().expect("stats").total, 12);
    }

    #[tokio::test]
    async fn upload_without_file_is_rejected() {
        let response = app(services(), true)
            .oneshot(multipart_request(
                "/documents/upload",
                multipart_body(&[("customer_id", "AB12CD")], None),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_upload_appends_system_note() {
        let services = services();
        let response = app(services.clone(), true)
            .oneshot(multipart_request(
                "/assistant/upload/chat-5",
                multipart_body(&[], Some("bank_statement.pdf")),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let history = services.chat.history("chat-5").expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "Document uploaded: bank_statement.pdf");
    }

    #[tokio::test]
    async fn core_routes_are_mounted() {
        let router = app(services(), true);
        let uris = [
            "/",
            "/dashboard/",
            "/leads/",
            "/pipeline/",
            "/risk/",
            "/documents/",
            "/assistant/sessions",
        ];
        for uri in uris {
            let response = router
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
                .await
                .expect("router responds");
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }
}
