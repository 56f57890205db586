//! Randomised credit evaluation shown at the end of an automation run.
//!
//! Every figure except the category and decision is drawn from a uniform source; the category
//! and decision are derived from the risk score alone.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const RISK_SCORE_RANGE: RangeInclusive<u8> = 35..=89;
pub const LOW_RISK_THRESHOLD: u8 = 70;
pub const HIGH_RISK_THRESHOLD: u8 = 50;
pub const LOAN_AMOUNT_STEP: u32 = 100_000;
pub const EMI_TENURE_MONTHS: u32 = 48;

/// NPA is drawn in tenths of a percent, half-open so 6.2 is never produced.
const NPA_TENTHS: std::ops::Range<u16> = 12..62;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskCategory {
    pub const fn from_score(score: u8) -> Self {
        if score >= LOW_RISK_THRESHOLD {
            Self::Low
        } else if score < HIGH_RISK_THRESHOLD {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low Risk",
            RiskCategory::Medium => "Medium Risk",
            RiskCategory::High => "High Risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CreditDecision {
    Approve,
    Review,
    Reject,
}

impl CreditDecision {
    pub const fn from_score(score: u8) -> Self {
        match RiskCategory::from_score(score) {
            RiskCategory::Low => Self::Approve,
            RiskCategory::Medium => Self::Review,
            RiskCategory::High => Self::Reject,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CreditDecision::Approve => "APPROVE",
            CreditDecision::Review => "REVIEW",
            CreditDecision::Reject => "REJECT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortfolioRisk {
    Stable,
    Moderate,
    Elevated,
}

impl PortfolioRisk {
    pub const ALL: [PortfolioRisk; 3] = [Self::Stable, Self::Moderate, Self::Elevated];

    pub const fn label(self) -> &'static str {
        match self {
            PortfolioRisk::Stable => "Stable",
            PortfolioRisk::Moderate => "Moderate",
            PortfolioRisk::Elevated => "Elevated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub risk_score: u8,
    pub category: RiskCategory,
    pub decision: CreditDecision,
    pub loan_amount: u32,
    pub emi: u32,
    pub portfolio_risk: PortfolioRisk,
    /// Expected non-performing asset ratio, in percent with one decimal.
    pub npa: f64,
}

impl EvaluationResult {
    /// Assemble a result, deriving category, decision and EMI from the inputs.
    pub fn new(risk_score: u8, loan_amount: u32, portfolio_risk: PortfolioRisk, npa: f64) -> Self {
        Self {
            risk_score,
            category: RiskCategory::from_score(risk_score),
            decision: CreditDecision::from_score(risk_score),
            loan_amount,
            emi: loan_amount / EMI_TENURE_MONTHS,
            portfolio_risk,
            npa,
        }
    }

    /// Transcript text announcing the finished evaluation.
    pub fn summary_message(&self) -> String {
        format!(
            "AI Credit Evaluation Complete ✅\n\n\
             Risk Score: {} ({})\n\
             Decision: {}\n\
             Loan Amount: {}\n\
             EMI: {}/month\n\n\
             Portfolio Risk: {}\n\
             Expected NPA: {:.1}%\n\n\
             ⚠️ Demo version: figures are simulated, not a credit decision.",
            self.risk_score,
            self.category.label(),
            self.decision.label(),
            format_rupees(u64::from(self.loan_amount)),
            format_rupees(u64::from(self.emi)),
            self.portfolio_risk.label(),
            self.npa,
        )
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "score {} ({}) -> {}",
            self.risk_score,
            self.category.label(),
            self.decision.label()
        )
    }
}

/// Draw a fresh evaluation from the thread-local generator.
pub fn generate_evaluation() -> EvaluationResult {
    generate_evaluation_with(&mut rand::thread_rng())
}

pub fn generate_evaluation_with<R: Rng + ?Sized>(rng: &mut R) -> EvaluationResult {
    let risk_score = rng.gen_range(RISK_SCORE_RANGE);
    let loan_amount = rng.gen_range(1..=9u32) * LOAN_AMOUNT_STEP;
    let portfolio_risk = PortfolioRisk::ALL[rng.gen_range(0..PortfolioRisk::ALL.len())];
    let npa = f64::from(rng.gen_range(NPA_TENTHS)) / 10.0;

    EvaluationResult::new(risk_score, loan_amount, portfolio_risk, npa)
}

/// Render an amount with Indian digit grouping, e.g. `₹5,00,000`.
pub fn format_rupees(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("₹{},{}", groups.join(","), tail)
}
