use std::fmt::Write as _;
use std::str::FromStr;

use mime::Mime;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};
use serde::Deserialize;

use super::report::MisReport;

const HEADER: [&str; 2] = ["Metric", "Value"];
const HEADER_FILL: u32 = 0x2563EB;
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN_LEFT: f32 = 25.0;
const VALUE_COLUMN: f32 = 110.0;
const ROW_HEIGHT: f32 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Excel,
    Csv,
    Text,
}

impl ExportFormat {
    pub fn exporter(self) -> Box<dyn ReportExporter> {
        match self {
            ExportFormat::Pdf => Box::new(PdfExporter),
            ExportFormat::Excel => Box::new(XlsxExporter),
            ExportFormat::Csv => Box::new(CsvExporter),
            ExportFormat::Text => Box::new(TextExporter),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "csv" => Ok(ExportFormat::Csv),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unsupported export type `{0}`")]
    UnsupportedFormat(String),
    #[error("spreadsheet rendering failed: {0}")]
    Spreadsheet(#[from] XlsxError),
    #[error("pdf rendering failed: {0}")]
    Pdf(#[from] printpdf::Error),
    #[error("csv rendering failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("report buffer error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders a report into a downloadable blob.
pub trait ReportExporter: Send + Sync {
    fn content_type(&self) -> Mime;
    fn extension(&self) -> &'static str;
    fn render(&self, report: &MisReport) -> Result<Vec<u8>, ExportError>;

    fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxExporter;

impl ReportExporter for XlsxExporter {
    fn content_type(&self) -> Mime {
        XLSX_MIME.parse().unwrap_or(mime::APPLICATION_OCTET_STREAM)
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn render(&self, report: &MisReport) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Loan MIS")?;

        let title_format = Format::new()
            .set_bold()
            .set_font_size(14)
            .set_align(FormatAlign::Center);
        let header_format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_font_color(Color::RGB(0xFFFFFF));

        worksheet.merge_range(0, 0, 0, 1, &report.title, &title_format)?;
        worksheet.write_string(1, 0, report.generated_label())?;
        for (col, header) in HEADER.iter().enumerate() {
            worksheet.write_string_with_format(2, col as u16, *header, &header_format)?;
        }
        for (index, row) in report.rows.iter().enumerate() {
            let line = 3 + index as u32;
            worksheet.write_string(line, 0, &row.metric)?;
            worksheet.write_string(line, 1, &row.value)?;
        }
        worksheet.set_column_width(0, 30)?;
        worksheet.set_column_width(1, 20)?;

        Ok(workbook.save_to_buffer()?)
    }
}

/// Single-page A4 document with the title, timestamp and the metric table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExporter;

/// Builtin PDF fonts only cover Latin-1, so the rupee sign is spelled out.
fn pdf_text(value: &str) -> String {
    value
        .replace('₹', "Rs. ")
        .chars()
        .filter(char::is_ascii)
        .collect()
}

impl ReportExporter for PdfExporter {
    fn content_type(&self) -> Mime {
        "application/pdf"
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM)
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, report: &MisReport) -> Result<Vec<u8>, ExportError> {
        let (document, page, layer) =
            PdfDocument::new(report.title.as_str(), PAGE_WIDTH, PAGE_HEIGHT, "report");
        let regular = document.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = document.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let canvas = document.get_page(page).get_layer(layer);

        let mut y = PAGE_HEIGHT.0 - 30.0;
        canvas.use_text(pdf_text(&report.title), 18.0, Mm(MARGIN_LEFT), Mm(y), &bold);
        y -= 10.0;
        canvas.use_text(report.generated_label(), 10.0, Mm(MARGIN_LEFT), Mm(y), &regular);
        y -= 16.0;

        canvas.use_text(HEADER[0], 12.0, Mm(MARGIN_LEFT), Mm(y), &bold);
        canvas.use_text(HEADER[1], 12.0, Mm(VALUE_COLUMN), Mm(y), &bold);
        for row in &report.rows {
            y -= ROW_HEIGHT;
            canvas.use_text(pdf_text(&row.metric), 11.0, Mm(MARGIN_LEFT), Mm(y), &regular);
            canvas.use_text(pdf_text(&row.value), 11.0, Mm(VALUE_COLUMN), Mm(y), &regular);
        }

        Ok(document.save_to_bytes()?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl ReportExporter for CsvExporter {
    fn content_type(&self) -> Mime {
        mime::TEXT_CSV_UTF_8
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, report: &MisReport) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER)?;
        for row in &report.rows {
            writer.write_record([row.metric.as_str(), row.value.as_str()])?;
        }
        writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))
    }
}

/// Plain-text report laid out as a two-column table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExporter;

impl TextExporter {
    pub fn render_string(&self, report: &MisReport) -> String {
        let width = report
            .rows
            .iter()
            .map(|row| row.metric.chars().count())
            .chain(std::iter::once(HEADER[0].len()))
            .max()
            .unwrap_or_default();

        let mut out = String::new();
        let _ = writeln!(out, "{}", report.title);
        let _ = writeln!(out, "{}", report.generated_label());
        out.push('\n');
        let _ = writeln!(out, "{:<width$}  {}", HEADER[0], HEADER[1]);
        let _ = writeln!(out, "{}", "-".repeat(width + 2 + HEADER[1].len()));
        for row in &report.rows {
            let _ = writeln!(out, "{:<width$}  {}", row.metric, row.value);
        }
        out
    }
}

impl ReportExporter for TextExporter {
    fn content_type(&self) -> Mime {
        mime::TEXT_PLAIN_UTF_8
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, report: &MisReport) -> Result<Vec<u8>, ExportError> {
        Ok(self.render_string(report).into_bytes())
    }
}
