use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";
pub const UNKNOWN_DOCUMENT_TYPE: &str = "Unknown";
pub const UNNAMED_FILE: &str = "Untitled Document";
const CUSTOMER_ID_LEN: usize = 6;

/// Opaque document identifier; assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl DocumentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentStatus::Pending => "Pending",
            DocumentStatus::Processing => "Processing",
            DocumentStatus::Completed => "Completed",
            DocumentStatus::Failed => "Failed",
        }
    }

    /// Whether a recalculation request is honored in this state.
    pub const fn accepts_recalculation(self) -> bool {
        matches!(self, DocumentStatus::Pending | DocumentStatus::Failed)
    }
}

/// Stored document together with its OCR state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub customer_id: String,
    pub customer_name: String,
    #[serde(rename = "name")]
    pub file_name: String,
    #[serde(rename = "type")]
    pub document_type: String,
    pub status: DocumentStatus,
    /// Only meaningful once the record is `Completed`.
    #[serde(rename = "fields")]
    pub extracted_field_count: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl DocumentRecord {
    pub fn pending(
        customer_id: impl Into<String>,
        customer_name: impl Into<String>,
        file_name: impl Into<String>,
        document_type: impl Into<String>,
    ) -> Self {
        Self {
            id: DocumentId::generate(),
            customer_id: customer_id.into(),
            customer_name: customer_name.into(),
            file_name: file_name.into(),
            document_type: document_type.into(),
            status: DocumentStatus::Pending,
            extracted_field_count: 0,
            failure_reason: None,
        }
    }

    pub fn completed(mut self, fields: u8) -> Self {
        self.status = DocumentStatus::Completed;
        self.extracted_field_count = fields;
        self.failure_reason = None;
        self
    }
}

/// Upload form as received from the client; blanks fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentUpload {
    pub file_name: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default, rename = "type")]
    pub document_type: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn into_record<R: Rng + ?Sized>(self, rng: &mut R) -> DocumentRecord {
        let customer_id = non_blank(self.customer_id).unwrap_or_else(|| generate_customer_id(rng));
        let customer_name =
            non_blank(self.customer_name).unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());
        let document_type =
            non_blank(self.document_type).unwrap_or_else(|| UNKNOWN_DOCUMENT_TYPE.to_string());

        let file_name =
            non_blank(Some(self.file_name)).unwrap_or_else(|| UNNAMED_FILE.to_string());

        DocumentRecord::pending(customer_id, customer_name, file_name, document_type)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Six-character uppercase alphanumeric customer reference.
pub fn generate_customer_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(CUSTOMER_ID_LEN)
        .map(|byte| char::from(byte).to_ascii_uppercase())
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub failed: usize,
}

impl DocumentStats {
    pub fn tally(records: &[DocumentRecord]) -> Self {
        records.iter().fold(
            Self {
                total: records.len(),
                ..Self::default()
            },
            |mut stats, record| {
                match record.status {
                    DocumentStatus::Completed => stats.completed += 1,
                    DocumentStatus::Pending => stats.pending += 1,
                    DocumentStatus::Failed => stats.failed += 1,
                    DocumentStatus::Processing => {}
                }
                stats
            },
        )
    }
}

/// Payload of the document listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOverview {
    pub stats: DocumentStats,
    pub documents: Vec<DocumentRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentUploadReceipt {
    pub message: &'static str,
    pub document: DocumentRecord,
}

impl DocumentUploadReceipt {
    pub fn new(document: DocumentRecord) -> Self {
        Self {
            message: "Uploaded successfully. OCR processing started.",
            document,
        }
    }
}
