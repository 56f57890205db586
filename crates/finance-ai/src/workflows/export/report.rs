use chrono::NaiveDateTime;
use serde::Serialize;

use crate::workflows::evaluation::{format_rupees, EvaluationResult};
use crate::workflows::portfolio::catalog::DashboardSnapshot;

pub const MIS_TITLE: &str = "Finance AI Loan MIS Report";
pub const APPROVAL_TITLE: &str = "Finance AI Loan Approval Report";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRow {
    pub metric: String,
    pub value: String,
}

impl MetricRow {
    fn new(metric: &str, value: impl ToString) -> Self {
        Self {
            metric: metric.to_string(),
            value: value.to_string(),
        }
    }
}

/// Flat metric/value table handed to an exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MisReport {
    pub title: String,
    pub generated_at: NaiveDateTime,
    pub rows: Vec<MetricRow>,
}

impl MisReport {
    pub fn from_dashboard(snapshot: &DashboardSnapshot, generated_at: NaiveDateTime) -> Self {
        let stats = &snapshot.stats;
        Self {
            title: MIS_TITLE.to_string(),
            generated_at,
            rows: vec![
                MetricRow::new("Total Leads", stats.total_leads),
                MetricRow::new("Applications", stats.applications),
                MetricRow::new("Approval Rate", format!("{}%", stats.approval_rate)),
                MetricRow::new("Average Risk Score", stats.avg_risk_score),
                MetricRow::new("Pipeline Value", snapshot.pipeline_value),
                MetricRow::new("Loans Approved", snapshot.approved),
                MetricRow::new("Loans Rejected", snapshot.rejected),
            ],
        }
    }

    pub fn approval(result: &EvaluationResult, generated_at: NaiveDateTime) -> Self {
        Self {
            title: APPROVAL_TITLE.to_string(),
            generated_at,
            rows: vec![
                MetricRow::new("Risk Score", result.risk_score),
                MetricRow::new("Risk Category", result.category.label()),
                MetricRow::new("Decision", result.decision.label()),
                MetricRow::new("Loan Amount", format_rupees(u64::from(result.loan_amount))),
                MetricRow::new("Monthly EMI", format_rupees(u64::from(result.emi))),
                MetricRow::new("Portfolio Risk", result.portfolio_risk.label()),
                MetricRow::new("Expected NPA", format!("{:.1}%", result.npa)),
            ],
        }
    }

    /// Timestamp line in the `17 Oct 2026, 03:04 PM` style.
    pub fn generated_label(&self) -> String {
        format!("Generated on: {}", self.generated_at.format("%d %b %Y, %I:%M %p"))
    }
}
