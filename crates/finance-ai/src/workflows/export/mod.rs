//! MIS and approval report export.

pub mod renderers;
pub mod report;
pub mod router;

pub use renderers::{
    CsvExporter, ExportError, ExportFormat, PdfExporter, ReportExporter, TextExporter,
    XlsxExporter,
};
pub use report::{MetricRow, MisReport, APPROVAL_TITLE, MIS_TITLE};
pub use router::export_router;
