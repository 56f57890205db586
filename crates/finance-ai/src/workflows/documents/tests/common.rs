use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::SimulationConfig;
use crate::workflows::documents::domain::{DocumentRecord, DocumentStatus};
use crate::workflows::documents::ocr::{OcrEngine, OcrError, SimulatedOcr, FIELD_COUNT_RANGE};
use crate::workflows::documents::repository::{DocumentRepository, InMemoryDocumentRepository};
use crate::workflows::documents::service::DocumentService;

pub(super) struct FailingOcr;

impl OcrEngine for FailingOcr {
    fn extract(&self, record: &DocumentRecord) -> Result<u8, OcrError> {
        Err(OcrError::Unreadable(format!("{} is blurred", record.file_name)))
    }
}

pub(super) const COUNTED_FIELDS: u8 = 6;

/// Fixed-result engine that records how many extractions ran.
#[derive(Default)]
pub(super) struct CountingOcr {
    calls: AtomicUsize,
}

impl CountingOcr {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for CountingOcr {
    fn extract(&self, _record: &DocumentRecord) -> Result<u8, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(COUNTED_FIELDS)
    }
}

pub(super) type SimulatedService = DocumentService<InMemoryDocumentRepository, SimulatedOcr>;

pub(super) fn service_over(
    records: Vec<DocumentRecord>,
) -> (SimulatedService, Arc<InMemoryDocumentRepository>) {
    let repository = Arc::new(InMemoryDocumentRepository::with_records(records));
    let service = DocumentService::new(
        repository.clone(),
        Arc::new(SimulatedOcr),
        SimulationConfig::default(),
    );
    (service, repository)
}

pub(super) fn seeded_service() -> SimulatedService {
    DocumentService::new(
        Arc::new(InMemoryDocumentRepository::seeded()),
        Arc::new(SimulatedOcr),
        SimulationConfig::default(),
    )
}

pub(super) fn pending_record() -> DocumentRecord {
    DocumentRecord::pending("R4V1K2", "Ravi Kumar", "ravi_aadhaar.pdf", "Aadhaar Card")
}

pub(super) fn stored(repository: &InMemoryDocumentRepository, record: &DocumentRecord) -> DocumentRecord {
    repository
        .fetch(&record.id)
        .expect("repository available")
        .expect("record stored")
}

pub(super) fn assert_completed(record: &DocumentRecord) {
    assert_eq!(record.status, DocumentStatus::Completed, "{record:?}");
    assert!(
        FIELD_COUNT_RANGE.contains(&record.extracted_field_count),
        "field count {} outside range",
        record.extracted_field_count
    );
    assert_eq!(record.failure_reason, None);
}
