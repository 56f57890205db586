//! Integration scenarios for the document status machine behind the public service and router.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use finance_ai::config::SimulationConfig;
use finance_ai::workflows::documents::{
    document_router, DocumentService, DocumentStatus, DocumentUpload, InMemoryDocumentRepository,
    SimulatedOcr, FIELD_COUNT_RANGE,
};
use serde_json::Value;
use tokio::time::sleep;
use tower::ServiceExt;

type Service = DocumentService<InMemoryDocumentRepository, SimulatedOcr>;

fn service() -> Arc<Service> {
    Arc::new(DocumentService::new(
        Arc::new(InMemoryDocumentRepository::seeded()),
        Arc::new(SimulatedOcr),
        SimulationConfig::default(),
    ))
}

async fn overview(service: &Arc<Service>) -> Value {
    let response = document_router(service.clone())
        .oneshot(Request::get("/documents/").body(Body::empty()).expect("request"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json")
}

#[tokio::test(start_paused = true)]
async fn every_seeded_pending_document_can_be_reprocessed() {
    let service = service();
    let pending: Vec<_> = service
        .list()
        .expect("list")
        .into_iter()
        .filter(|record| record.status == DocumentStatus::Pending)
        .collect();
    assert_eq!(pending.len(), 4);

    for record in &pending {
        service.recalculate(&record.id).expect("known id");
    }
    assert_eq!(overview(&service).await["stats"]["pending"], 0);

    sleep(Duration::from_millis(1501)).await;
    let body = overview(&service).await;
    assert_eq!(body["stats"]["completed"], 11);
    for record in &pending {
        let stored = service.get(&record.id).expect("stored");
        assert_eq!(stored.status, DocumentStatus::Completed);
        assert!(FIELD_COUNT_RANGE.contains(&stored.extracted_field_count));
    }
}

#[tokio::test(start_paused = true)]
async fn upload_shows_up_pending_then_completes() {
    let service = service();
    let record = service
        .upload(DocumentUpload::new("neha_pan.jpg"))
        .expect("upload accepted");

    let body = overview(&service).await;
    assert_eq!(body["stats"]["total"], 12);
    assert_eq!(body["stats"]["pending"], 5);

    sleep(Duration::from_millis(2001)).await;
    let stored = service.get(&record.id).expect("stored");
    assert_eq!(stored.status, DocumentStatus::Completed);
    assert_eq!(overview(&service).await["stats"]["pending"], 4);
}
