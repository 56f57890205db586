//! Portfolio views: dashboard, leads, pipeline, risk scoring, and the live dashboard feed.

pub mod catalog;
pub mod live;
pub mod risk;
pub mod router;

pub use catalog::{
    dashboard, leads, pipeline, risk_overview, search_leads, DashboardSnapshot, DashboardStats,
    Lead, PipelineBoard, RiskOverview, DASHBOARD_STATS, PIPELINE_VALUE,
};
pub use live::{stats_patch, DashboardState, LiveFeed, PatchError};
pub use risk::{
    analyze, approval_probability, quick_risk, risk_score, QuickRisk, RiskAssessment,
    RiskDecision, RiskInputError, RiskLevel, RiskRequest,
};
pub use router::portfolio_router;
