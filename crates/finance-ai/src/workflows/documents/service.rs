use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;

use super::domain::{
    DocumentId, DocumentOverview, DocumentRecord, DocumentStats, DocumentStatus, DocumentUpload,
};
use super::ocr::OcrEngine;
use super::repository::{DocumentRepository, RepositoryError};

/// Result of a recalculation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recalculation {
    /// Moved to `Processing`; a completion is scheduled.
    Scheduled(DocumentRecord),
    /// The record was not in a recalculable state and is returned unchanged.
    Ignored(DocumentRecord),
}

impl Recalculation {
    pub fn record(&self) -> &DocumentRecord {
        match self {
            Recalculation::Scheduled(record) | Recalculation::Ignored(record) => record,
        }
    }
}

/// Latest scheduled completion per document; older timers find a newer generation and stand down.
type Generations = Arc<Mutex<HashMap<DocumentId, u64>>>;

fn lock_generations(generations: &Generations) -> MutexGuard<'_, HashMap<DocumentId, u64>> {
    generations
        .lock()
        .expect("document generations mutex poisoned")
}

fn next_generation(generations: &mut HashMap<DocumentId, u64>, id: &DocumentId) -> u64 {
    let generation = generations.entry(id.clone()).or_insert(0);
    *generation += 1;
    *generation
}

/// Document status machine: uploads start `Pending` and settle after the OCR delay.
///
/// Every scheduled completion observes the service's cancellation token, and only the most
/// recently scheduled completion for a document is applied.
pub struct DocumentService<R, O> {
    repository: Arc<R>,
    ocr: Arc<O>,
    upload_delay: Duration,
    recalculate_delay: Duration,
    cancel: CancellationToken,
    generations: Generations,
}

impl<R, O> DocumentService<R, O>
where
    R: DocumentRepository + 'static,
    O: OcrEngine + 'static,
{
    pub fn new(repository: Arc<R>, ocr: Arc<O>, delays: SimulationConfig) -> Self {
        Self {
            repository,
            ocr,
            upload_delay: delays.upload_ocr_delay,
            recalculate_delay: delays.recalculate_delay,
            cancel: CancellationToken::new(),
            generations: Generations::default(),
        }
    }

    /// Tie scheduled completions to an outer scope, such as the server's shutdown token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn upload(&self, upload: DocumentUpload) -> Result<DocumentRecord, DocumentServiceError> {
        let record = upload.into_record(&mut rand::thread_rng());
        let stored = self.repository.insert(record)?;
        info!(
            document_id = %stored.id,
            customer_id = %stored.customer_id,
            file = %stored.file_name,
            "document uploaded"
        );

        let generation = next_generation(&mut lock_generations(&self.generations), &stored.id);
        self.schedule_completion(stored.id.clone(), generation, self.upload_delay);
        Ok(stored)
    }

    /// Reprocess a `Pending` or `Failed` document; this supersedes any completion still in flight.
    pub fn recalculate(&self, id: &DocumentId) -> Result<Recalculation, DocumentServiceError> {
        let mut generations = lock_generations(&self.generations);
        let mut record = self.get(id)?;
        if !record.status.accepts_recalculation() {
            debug!(document_id = %id, status = record.status.label(), "recalculation ignored");
            return Ok(Recalculation::Ignored(record));
        }

        record.status = DocumentStatus::Processing;
        record.failure_reason = None;
        self.repository.update(record.clone())?;
        let generation = next_generation(&mut generations, id);
        drop(generations);
        info!(document_id = %id, generation, "document reprocessing started");

        self.schedule_completion(id.clone(), generation, self.recalculate_delay);
        Ok(Recalculation::Scheduled(record))
    }

    pub fn get(&self, id: &DocumentId) -> Result<DocumentRecord, DocumentServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| DocumentServiceError::NotFound(id.clone()))
    }

    pub fn list(&self) -> Result<Vec<DocumentRecord>, DocumentServiceError> {
        Ok(self.repository.list()?)
    }

    pub fn stats(&self) -> Result<DocumentStats, DocumentServiceError> {
        Ok(DocumentStats::tally(&self.repository.list()?))
    }

    pub fn overview(&self) -> Result<DocumentOverview, DocumentServiceError> {
        let documents = self.repository.list()?;
        Ok(DocumentOverview {
            stats: DocumentStats::tally(&documents),
            documents,
        })
    }

    /// Drop every completion that has not fired yet.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn schedule_completion(&self, id: DocumentId, generation: u64, delay: Duration) {
        let repository = Arc::clone(&self.repository);
        let ocr = Arc::clone(&self.ocr);
        let generations = Arc::clone(&self.generations);
        let cancel = self.cancel.clone();
        debug!(
            document_id = %id,
            generation,
            delay_ms = delay.as_millis() as u64,
            "completion scheduled"
        );

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(document_id = %id, "completion cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    let latest = lock_generations(&generations);
                    if latest.get(&id) != Some(&generation) {
                        debug!(document_id = %id, generation, "superseded completion skipped");
                    } else if let Err(err) = complete(repository.as_ref(), ocr.as_ref(), &id) {
                        warn!(document_id = %id, error = %err, "document completion failed");
                    }
                }
            }
        });
    }
}

fn complete<R, O>(repository: &R, ocr: &O, id: &DocumentId) -> Result<(), RepositoryError>
where
    R: DocumentRepository + ?Sized,
    O: OcrEngine + ?Sized,
{
    let record = repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;

    let record = match ocr.extract(&record) {
        Ok(fields) => {
            info!(document_id = %id, fields, "document processed");
            record.completed(fields)
        }
        Err(err) => {
            warn!(document_id = %id, error = %err, "ocr extraction failed");
            DocumentRecord {
                status: DocumentStatus::Failed,
                extracted_field_count: 0,
                failure_reason: Some(err.to_string()),
                ..record
            }
        }
    };

    repository.update(record)
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentServiceError {
    #[error("document {0} not found")]
    NotFound(DocumentId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
