//! Static portfolio views served to the dashboard, leads, pipeline and risk pages.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_leads: u32,
    pub applications: u32,
    /// Whole percent.
    pub approval_rate: u32,
    pub avg_risk_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub week: &'static str,
    pub leads: u32,
    pub applications: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecentLead {
    pub name: &'static str,
    pub amount: &'static str,
    #[serde(rename = "type")]
    pub purpose: &'static str,
    pub score: u32,
    pub status: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    #[serde(rename = "Lead")]
    pub lead: u32,
    #[serde(rename = "Docs Pending")]
    pub docs_pending: u32,
    #[serde(rename = "Under Review")]
    pub under_review: u32,
    #[serde(rename = "Approved")]
    pub approved: u32,
    #[serde(rename = "Rejected")]
    pub rejected: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AiPrediction {
    pub approval_probability: f64,
    pub risk: &'static str,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub trend: Vec<TrendPoint>,
    pub risk_distribution: RiskDistribution,
    pub pipeline_value: &'static str,
    pub approved: u32,
    pub rejected: u32,
    pub recent_leads: Vec<RecentLead>,
    pub pipeline_summary: PipelineSummary,
    pub ai_prediction: AiPrediction,
}

pub const DASHBOARD_STATS: DashboardStats = DashboardStats {
    total_leads: 13,
    applications: 8,
    approval_rate: 25,
    avg_risk_score: 64,
};

pub const PIPELINE_VALUE: &str = "₹5.5Cr";

pub fn dashboard() -> DashboardSnapshot {
    DashboardSnapshot {
        stats: DASHBOARD_STATS,
        trend: vec![
            TrendPoint { week: "W1", leads: 4, applications: 2 },
            TrendPoint { week: "W2", leads: 7, applications: 3 },
            TrendPoint { week: "W3", leads: 9, applications: 5 },
            TrendPoint { week: "W4", leads: 11, applications: 6 },
            TrendPoint { week: "Now", leads: 13, applications: 8 },
        ],
        risk_distribution: RiskDistribution {
            low: 6,
            medium: 3,
            high: 4,
        },
        pipeline_value: PIPELINE_VALUE,
        approved: 2,
        rejected: 2,
        recent_leads: vec![
            RecentLead {
                name: "YOGANA",
                amount: "₹5,000",
                purpose: "construction",
                score: 70,
                status: "Lead",
            },
            RecentLead {
                name: "Priya Patel",
                amount: "₹32,00,000",
                purpose: "home purchase",
                score: 75,
                status: "Under Review",
            },
            RecentLead {
                name: "Amit Singh Chauhan",
                amount: "₹75,00,000",
                purpose: "construction",
                score: 68,
                status: "Lead",
            },
            RecentLead {
                name: "Sneha Reddy",
                amount: "₹28,00,000",
                purpose: "renovation",
                score: 71,
                status: "Approved",
            },
        ],
        pipeline_summary: PipelineSummary {
            lead: 4,
            docs_pending: 5,
            under_review: 2,
            approved: 2,
            rejected: 2,
        },
        ai_prediction: AiPrediction {
            approval_probability: 0.78,
            risk: "Moderate",
            recommendation: "Approve with Conditions",
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lead {
    pub name: &'static str,
    pub email: &'static str,
    pub loan: &'static str,
    #[serde(rename = "type")]
    pub purpose: &'static str,
    pub income: &'static str,
    pub score: u32,
    pub status: &'static str,
}

const LEADS: &[Lead] = &[
    Lead {
        name: "YOGANA",
        email: "yogana@example.in",
        loan: "₹5,000",
        purpose: "construction",
        income: "₹35,000",
        score: 70,
        status: "Lead",
    },
    Lead {
        name: "Priya Patel",
        email: "priya.patel@example.in",
        loan: "₹32,00,000",
        purpose: "home purchase",
        income: "₹95,000",
        score: 75,
        status: "Under Review",
    },
    Lead {
        name: "Amit Singh Chauhan",
        email: "amit.chauhan@example.in",
        loan: "₹75,00,000",
        purpose: "construction",
        income: "₹2,10,000",
        score: 68,
        status: "Lead",
    },
    Lead {
        name: "Sneha Reddy",
        email: "sneha.reddy@example.in",
        loan: "₹28,00,000",
        purpose: "renovation",
        income: "₹78,000",
        score: 71,
        status: "Approved",
    },
    Lead {
        name: "Vikram Desai",
        email: "vikram.desai@example.in",
        loan: "₹1,20,00,000",
        purpose: "home purchase",
        income: "₹3,20,000",
        score: 91,
        status: "Approved",
    },
    Lead {
        name: "Ravi Kumar Sharma",
        email: "ravi.sharma@example.in",
        loan: "₹40,00,000",
        purpose: "balance transfer",
        income: "₹1,25,000",
        score: 74,
        status: "Docs Pending",
    },
    Lead {
        name: "Anjali Mehta",
        email: "anjali.mehta@example.in",
        loan: "₹18,00,000",
        purpose: "renovation",
        income: "₹45,000",
        score: 28,
        status: "Rejected",
    },
];

pub fn leads() -> Vec<Lead> {
    LEADS.to_vec()
}

/// Case-insensitive substring match on name or email; a blank query keeps every lead.
pub fn search_leads(query: &str) -> Vec<Lead> {
    let query = query.trim().to_lowercase();
    LEADS
        .iter()
        .filter(|lead| {
            query.is_empty()
                || lead.name.to_lowercase().contains(&query)
                || lead.email.to_lowercase().contains(&query)
        })
        .copied()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineStages {
    #[serde(rename = "Lead Intake")]
    pub lead_intake: u32,
    #[serde(rename = "Documents")]
    pub documents: u32,
    #[serde(rename = "ML Review")]
    pub ml_review: u32,
    #[serde(rename = "Approved")]
    pub approved: u32,
    #[serde(rename = "Rejected")]
    pub rejected: u32,
    #[serde(rename = "Disbursed")]
    pub disbursed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineApplication {
    pub name: &'static str,
    pub credit: u16,
    pub pan: &'static str,
    pub salary: &'static str,
    pub foir: &'static str,
    pub risk: u32,
    pub decision: Option<&'static str>,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineBoard {
    pub stages: PipelineStages,
    pub applications: Vec<PipelineApplication>,
}

pub fn pipeline() -> PipelineBoard {
    let application = |name, credit, pan, salary, foir, risk, decision, status| {
        PipelineApplication {
            name,
            credit,
            pan,
            salary,
            foir,
            risk,
            decision,
            status,
        }
    };

    PipelineBoard {
        stages: PipelineStages {
            lead_intake: 4,
            documents: 2,
            ml_review: 2,
            approved: 2,
            rejected: 2,
            disbursed: 0,
        },
        applications: vec![
            application("Priya Patel", 742, "BXKPP4521A", "₹95,000", "16%", 72, None, "Under Review"),
            application("Sneha Reddy", 780, "CVLSR8634K", "₹78,000", "10%", 85, Some("Approve"), "Approved"),
            application("Vikram Desai", 810, "AHJPD6677M", "₹3,20,000", "14%", 91, Some("Approve"), "Approved"),
            application("Anjali Mehta", 580, "DMMPM3345L", "₹45,000", "49%", 28, Some("Reject"), "Rejected"),
            application("Ravi Kumar Sharma", 720, "AEXPS7823N", "₹1,25,000", "14%", 74, None, "Docs Pending"),
            application("Rajesh Iyer", 695, "BKKRT9912H", "₹1,55,000", "16%", 62, None, "Docs Pending"),
            application("Deepika Nair", 755, "CANDN5567P", "₹1,85,000", "6%", 81, None, "Under Review"),
        ],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskApplicant {
    pub name: &'static str,
    pub pan: &'static str,
    pub credit: u16,
    pub foir: &'static str,
    pub risk: u32,
    pub category: &'static str,
    pub decision: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskOverview {
    pub average_risk: u32,
    pub distribution: RiskDistribution,
    pub applicants: Vec<RiskApplicant>,
}

pub fn risk_overview() -> RiskOverview {
    RiskOverview {
        average_risk: 64,
        distribution: RiskDistribution {
            low: 1,
            medium: 1,
            high: 1,
        },
        applicants: vec![
            RiskApplicant {
                name: "Rahul Sharma",
                pan: "ABCDE1234F",
                credit: 720,
                foir: "32%",
                risk: 78,
                category: "Low",
                decision: "Approve",
            },
            RiskApplicant {
                name: "Priya Verma",
                pan: "PQRSV5678K",
                credit: 640,
                foir: "48%",
                risk: 55,
                category: "Medium",
                decision: "Conditional",
            },
            RiskApplicant {
                name: "Amit Das",
                pan: "LMNOP4321Z",
                credit: 580,
                foir: "62%",
                risk: 35,
                category: "High",
                decision: "Reject",
            },
        ],
    }
}
