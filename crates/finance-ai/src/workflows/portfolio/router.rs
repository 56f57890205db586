use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::catalog::{dashboard, pipeline, risk_overview, search_leads};
use super::risk::{analyze, quick_risk, RiskRequest};

#[derive(Debug, Default, Deserialize)]
pub struct LeadQuery {
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuickRiskQuery {
    pub income: f64,
    pub loan: f64,
}

/// Read-only portfolio views plus the risk scoring endpoints.
pub fn portfolio_router() -> Router {
    Router::new()
        .route("/dashboard/", get(dashboard_handler))
        .route("/leads/", get(leads_handler))
        .route("/pipeline/", get(pipeline_handler))
        .route("/risk/", get(risk_handler))
        .route("/risk/analyze", post(analyze_handler))
        .route("/risk/demo", get(demo_handler))
        .route("/risk/quick", get(quick_handler))
}

async fn dashboard_handler() -> Response {
    (StatusCode::OK, Json(dashboard())).into_response()
}

async fn leads_handler(Query(query): Query<LeadQuery>) -> Response {
    let leads = search_leads(query.search.as_deref().unwrap_or_default());
    (StatusCode::OK, Json(leads)).into_response()
}

async fn pipeline_handler() -> Response {
    (StatusCode::OK, Json(pipeline())).into_response()
}

async fn risk_handler() -> Response {
    (StatusCode::OK, Json(risk_overview())).into_response()
}

fn assess(request: RiskRequest) -> Response {
    match analyze(&request) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(error) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

async fn analyze_handler(Json(request): Json<RiskRequest>) -> Response {
    assess(request)
}

async fn demo_handler() -> Response {
    assess(RiskRequest::demo())
}

async fn quick_handler(Query(query): Query<QuickRiskQuery>) -> Response {
    (StatusCode::OK, Json(quick_risk(query.income, query.loan))).into_response()
}
