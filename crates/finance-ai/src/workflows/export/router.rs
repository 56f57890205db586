use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::workflows::evaluation::EvaluationResult;
use crate::workflows::portfolio::catalog::dashboard;

use super::renderers::{ExportError, ExportFormat, ReportExporter};
use super::report::MisReport;

const MIS_FILE_STEM: &str = "Loan_MIS_Report";
const APPROVAL_FILE_STEM: &str = "Loan_Approval_Report";

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(rename = "type")]
    pub format: Option<String>,
}

pub fn export_router() -> Router {
    Router::new()
        .route("/api/export-mis", get(export_mis_handler))
        .route("/api/export-approval", post(export_approval_handler))
}

fn attachment(exporter: &dyn ReportExporter, stem: &str, report: &MisReport) -> Response {
    match exporter.render(report) {
        Ok(bytes) => {
            let disposition = format!("attachment; filename=\"{}\"", exporter.file_name(stem));
            info!(bytes = bytes.len(), file = stem, "report exported");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, exporter.content_type().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ExportError) -> Response {
    let status = match error {
        ExportError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
        _ => {
            warn!(error = %error, "report export failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

async fn export_mis_handler(Query(query): Query<ExportQuery>) -> Response {
    let format = match query.format.as_deref().unwrap_or_default().parse::<ExportFormat>() {
        Ok(format) => format,
        Err(error) => return error_response(error),
    };

    let report = MisReport::from_dashboard(&dashboard(), Local::now().naive_local());
    attachment(format.exporter().as_ref(), MIS_FILE_STEM, &report)
}

/// Approval report for an evaluation; PDF unless `type` asks otherwise.
async fn export_approval_handler(
    Query(query): Query<ExportQuery>,
    Json(result): Json<EvaluationResult>,
) -> Response {
    let format = match query.format.as_deref() {
        None => ExportFormat::Pdf,
        Some(raw) => match raw.parse::<ExportFormat>() {
            Ok(format) => format,
            Err(error) => return error_response(error),
        },
    };

    let report = MisReport::approval(&result, Local::now().naive_local());
    attachment(format.exporter().as_ref(), APPROVAL_FILE_STEM, &report)
}
