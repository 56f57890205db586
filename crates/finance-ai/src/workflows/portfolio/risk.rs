//! Deterministic applicant scoring used by the risk endpoints and the offline assistant.

use serde::{Deserialize, Serialize};

const CREDIT_WEIGHT: f64 = 0.35;
const INCOME_WEIGHT: f64 = 0.25;
const EMI_WEIGHT: f64 = 0.20;
const AGE_WEIGHT: f64 = 0.20;

const CREDIT_FLOOR: f64 = 300.0;
const CREDIT_SPAN: f64 = 600.0;
/// Age at which the stability factor peaks.
const PEAK_AGE: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskRequest {
    pub income: f64,
    pub loan_amount: f64,
    pub age: u8,
    pub credit_score: u16,
    pub existing_emis: f64,
}

impl RiskRequest {
    /// Applicant profile served by `GET /risk/demo`.
    pub fn demo() -> Self {
        Self {
            income: 85_000.0,
            loan_amount: 2_500_000.0,
            age: 35,
            credit_score: 720,
            existing_emis: 12_000.0,
        }
    }

    pub fn validate(&self) -> Result<(), RiskInputError> {
        if !(self.income > 0.0) {
            return Err(RiskInputError::NonPositive { field: "income" });
        }
        if !(self.loan_amount > 0.0) {
            return Err(RiskInputError::NonPositive {
                field: "loan_amount",
            });
        }
        if !(18..=75).contains(&self.age) {
            return Err(RiskInputError::AgeOutOfRange(self.age));
        }
        if !(300..=900).contains(&self.credit_score) {
            return Err(RiskInputError::CreditScoreOutOfRange(self.credit_score));
        }
        if !(self.existing_emis >= 0.0) {
            return Err(RiskInputError::NegativeEmis);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RiskInputError {
    #[error("{field} must be greater than zero")]
    NonPositive { field: &'static str },
    #[error("age {0} is outside the supported 18-75 range")]
    AgeOutOfRange(u8),
    #[error("credit score {0} is outside the 300-900 range")]
    CreditScoreOutOfRange(u16),
    #[error("existing_emis cannot be negative")]
    NegativeEmis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Invalid,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Invalid => "Invalid",
        }
    }

    pub fn classify(score: f64) -> Self {
        if score >= 70.0 {
            Self::Low
        } else if score >= 40.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskDecision {
    Approve,
    Conditional,
    Reject,
}

impl RiskDecision {
    pub const fn label(self) -> &'static str {
        match self {
            RiskDecision::Approve => "Approve",
            RiskDecision::Conditional => "Conditional",
            RiskDecision::Reject => "Reject",
        }
    }

    pub fn from_probability(probability: f64) -> Self {
        if probability >= 75.0 {
            Self::Approve
        } else if probability >= 50.0 {
            Self::Conditional
        } else {
            Self::Reject
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub category: RiskLevel,
    pub approval_probability: f64,
    pub decision: RiskDecision,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Weighted blend of credit, income cover, EMI burden and age stability, on a 0-100 scale.
pub fn risk_score(request: &RiskRequest) -> f64 {
    let income_to_loan = request.income / request.loan_amount;
    let emi_ratio = request.existing_emis / request.income;

    let credit = (f64::from(request.credit_score) - CREDIT_FLOOR) / CREDIT_SPAN;
    let income = (income_to_loan / 5.0).min(1.0);
    let emi = 1.0 - emi_ratio.min(1.0);
    let age = (-(f64::from(request.age) - PEAK_AGE).powi(2) / 200.0).exp();

    let score = CREDIT_WEIGHT * credit + INCOME_WEIGHT * income + EMI_WEIGHT * emi + AGE_WEIGHT * age;
    round2((score * 100.0).clamp(0.0, 100.0))
}

/// Logistic curve centred on a score of 60, returned as a percentage.
pub fn approval_probability(score: f64) -> f64 {
    let probability = 1.0 / (1.0 + (-(score - 60.0) / 10.0).exp());
    round2(probability * 100.0)
}

pub fn analyze(request: &RiskRequest) -> Result<RiskAssessment, RiskInputError> {
    request.validate()?;

    let risk_score = risk_score(request);
    let approval_probability = approval_probability(risk_score);

    Ok(RiskAssessment {
        risk_score,
        category: RiskLevel::classify(risk_score),
        approval_probability,
        decision: RiskDecision::from_probability(approval_probability),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuickRisk {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
}

/// Coarse bucket on the loan-to-income multiple alone.
pub fn quick_risk(income: f64, loan: f64) -> QuickRisk {
    if income <= 0.0 {
        return QuickRisk {
            risk_score: 0,
            risk_level: RiskLevel::Invalid,
        };
    }

    let ratio = loan / income;
    let (risk_score, risk_level) = if ratio < 2.0 {
        (80, RiskLevel::Low)
    } else if ratio < 4.0 {
        (55, RiskLevel::Medium)
    } else {
        (25, RiskLevel::High)
    };

    QuickRisk {
        risk_score,
        risk_level,
    }
}
