//! Keyword intents answered by the offline assistant backend.

use crate::workflows::portfolio::risk::{analyze, RiskRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Eligibility,
    Risk,
    Emi,
    Documents,
    General,
}

pub fn detect_intent(text: &str) -> Intent {
    let text = text.to_lowercase();

    if text.contains("eligib") || text.contains("approve") {
        Intent::Eligibility
    } else if text.contains("risk") {
        Intent::Risk
    } else if text.contains("emi") {
        Intent::Emi
    } else if text.contains("doc") {
        Intent::Documents
    } else {
        Intent::General
    }
}

fn eligibility_profile() -> RiskRequest {
    RiskRequest {
        income: 90_000.0,
        loan_amount: 2_500_000.0,
        age: 34,
        credit_score: 720,
        existing_emis: 12_000.0,
    }
}

impl Intent {
    pub fn reply(self) -> String {
        match self {
            Intent::Risk => "Loan risk depends on credit score, EMI burden, income ratio, and age stability.".to_string(),
            Intent::Emi => "Banks usually allow EMIs up to 40–50% of monthly income.".to_string(),
            Intent::Documents => "Required documents: ID proof, address proof, income proof, bank statement, property papers.".to_string(),
            Intent::Eligibility => match analyze(&eligibility_profile()) {
                Ok(assessment) => format!(
                    "Approval probability is {:.2}% with {} risk. Recommendation: {}.",
                    assessment.approval_probability,
                    assessment.category.label(),
                    assessment.decision.label(),
                ),
                Err(_) => Intent::General.reply(),
            },
            Intent::General => "I can help with loan eligibility, EMI limits, risk, and required documents.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_intents_in_priority_order() {
        assert_eq!(detect_intent("Am I eligible?"), Intent::Eligibility);
        assert_eq!(detect_intent("will you approve my risk"), Intent::Eligibility);
        assert_eq!(detect_intent("What is the RISK?"), Intent::Risk);
        assert_eq!(detect_intent("max emi please"), Intent::Emi);
        assert_eq!(detect_intent("which documents"), Intent::Documents);
        assert_eq!(detect_intent("I need a loan"), Intent::General);
    }

    #[test]
    fn eligibility_reply_reports_probability() {
        let reply = Intent::Eligibility.reply();
        assert!(reply.starts_with("Approval probability is "), "{reply}");
        assert!(reply.contains("Medium risk"), "{reply}");
    }
}
