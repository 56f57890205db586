//! Uploaded customer documents and their simulated OCR lifecycle.

pub mod domain;
pub mod ocr;
pub mod repository;
pub mod router;
mod seed;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    generate_customer_id, DocumentId, DocumentOverview, DocumentRecord, DocumentStats,
    DocumentStatus, DocumentUpload, DocumentUploadReceipt, UNKNOWN_CUSTOMER,
    UNKNOWN_DOCUMENT_TYPE, UNNAMED_FILE,
};
pub use ocr::{OcrEngine, OcrError, SimulatedOcr, FIELD_COUNT_RANGE};
pub use repository::{DocumentRepository, InMemoryDocumentRepository, RepositoryError};
pub use router::document_router;
pub use seed::seed_documents;
pub use service::{DocumentService, DocumentServiceError, Recalculation};
