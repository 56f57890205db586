use super::common::*;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::workflows::assistant::assistant_router;

fn chat_request(body: serde_json::Value) -> Request<Body> {
    Request::post("/assistant/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn chat_route_returns_chat_id_and_reply() {
    let (service, _) = chat_service();
    let router = assistant_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(chat_request(json!({ "message": "what is the risk?" })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let chat_id = body["chat_id"].as_str().expect("chat id").to_string();
    assert!(body["reply"]
        .as_str()
        .expect("reply text")
        .contains("credit score"));

    let response = router
        .oneshot(
            Request::get(format!("/assistant/history/{chat_id}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let history = read_json_body(response).await;
    assert_eq!(history.as_array().map(Vec::len), Some(2));
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[1]["role"], "assistant");
}

#[tokio::test]
async fn chat_route_rejects_blank_message() {
    let (service, _) = chat_service();
    let router = assistant_router(Arc::new(service));

    let response = router
        .oneshot(chat_request(json!({ "message": "", "chat_id": null })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn sessions_route_lists_titles() {
    let (service, _) = chat_service();
    service
        .respond(crate::workflows::assistant::ChatRequest {
            message: "emi question".to_string(),
            chat_id: Some("chat-1".to_string()),
        })
        .expect("reply");
    let router = assistant_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::get("/assistant/sessions")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    let body = read_json_body(response).await;
    assert_eq!(body, json!([{ "chat_id": "chat-1", "title": "emi question" }]));
}
