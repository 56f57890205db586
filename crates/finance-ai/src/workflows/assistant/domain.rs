use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::workflows::evaluation::EvaluationResult;

pub const LOAN_OPTIONS_MARKER: &str = "loan-options";
pub const EXPORT_MARKER_PREFIX: &str = "download-pdf-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// One transcript entry. System entries may carry a UI marker instead of prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn loan_options() -> Self {
        Self::system(LOAN_OPTIONS_MARKER)
    }

    /// Marker prompting the UI to offer the approval report for download.
    pub fn export_prompt(result: &EvaluationResult) -> Result<Self, serde_json::Error> {
        let payload = serde_json::to_string(result)?;
        Ok(Self::system(format!("{EXPORT_MARKER_PREFIX}{payload}")))
    }

    pub fn marker(&self) -> Option<UiMarker> {
        if self.role != ChatRole::System {
            return None;
        }
        if self.content == LOAN_OPTIONS_MARKER {
            return Some(UiMarker::LoanOptions);
        }
        self.content
            .strip_prefix(EXPORT_MARKER_PREFIX)
            .and_then(|payload| serde_json::from_str(payload).ok())
            .map(UiMarker::ExportReport)
    }
}

/// Inline widgets the transcript can ask the presentation layer to render.
#[derive(Debug, Clone, PartialEq)]
pub enum UiMarker {
    LoanOptions,
    ExportReport(EvaluationResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanType {
    #[serde(rename = "Personal Loan")]
    Personal,
    #[serde(rename = "Home Loan")]
    Home,
    #[serde(rename = "Business Loan")]
    Business,
    #[serde(rename = "Car Loan")]
    Car,
}

impl LoanType {
    pub const ALL: [LoanType; 4] = [Self::Personal, Self::Home, Self::Business, Self::Car];

    pub const fn label(self) -> &'static str {
        match self {
            LoanType::Personal => "Personal Loan",
            LoanType::Home => "Home Loan",
            LoanType::Business => "Business Loan",
            LoanType::Car => "Car Loan",
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown loan type '{0}'")]
pub struct UnknownLoanType(pub String);

impl FromStr for LoanType {
    type Err = UnknownLoanType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        let short = normalized.trim_end_matches(" loan");
        LoanType::ALL
            .into_iter()
            .find(|loan| {
                let label = loan.label().to_ascii_lowercase();
                label == normalized || label.trim_end_matches(" loan") == short
            })
            .ok_or_else(|| UnknownLoanType(raw.to_string()))
    }
}

/// Payload accepted by the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub chat_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub chat_id: String,
    pub reply: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSessionSummary {
    pub chat_id: String,
    pub title: String,
}
