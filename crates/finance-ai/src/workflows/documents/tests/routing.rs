use super::common::*;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tower::ServiceExt;

use crate::workflows::documents::document_router;

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn listing_returns_stats_and_documents() {
    let router = document_router(Arc::new(seeded_service()));

    let response = router
        .oneshot(Request::get("/documents/").body(Body::empty()).expect("request"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["stats"]["total"], 11);
    assert_eq!(body["stats"]["failed"], 0);
    assert_eq!(body["documents"][0]["customer_name"], "Sneha Reddy");
    assert_eq!(body["documents"][0]["type"], "Aadhaar Card");
}

#[tokio::test]
async fn recalculate_route_reports_scheduling() {
    let pending = pending_record();
    let (service, _) = service_over(vec![pending.clone()]);
    let router = document_router(Arc::new(service));

    let uri = format!("/documents/{}/recalculate", pending.id);
    let response = router
        .clone()
        .oneshot(Request::post(uri.as_str()).body(Body::empty()).expect("request"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["scheduled"], true);
    assert_eq!(body["document"]["status"], "Processing");

    let response = router
        .clone()
        .oneshot(Request::post(uri.as_str()).body(Body::empty()).expect("request"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["scheduled"], false);

    let response = router
        .oneshot(
            Request::post("/documents/unknown/recalculate")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
