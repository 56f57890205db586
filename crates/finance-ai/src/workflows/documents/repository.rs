use std::sync::{Arc, Mutex};

use super::domain::{DocumentId, DocumentRecord};

/// Storage abstraction so the document service can be exercised in isolation.
pub trait DocumentRepository: Send + Sync {
    fn insert(&self, record: DocumentRecord) -> Result<DocumentRecord, RepositoryError>;
    fn update(&self, record: DocumentRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &DocumentId) -> Result<Option<DocumentRecord>, RepositoryError>;
    /// All records in upload order.
    fn list(&self) -> Result<Vec<DocumentRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Default, Clone)]
pub struct InMemoryDocumentRepository {
    records: Arc<Mutex<Vec<DocumentRecord>>>,
}

impl InMemoryDocumentRepository {
    pub fn with_records(records: Vec<DocumentRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Repository preloaded with the demo catalog.
    pub fn seeded() -> Self {
        Self::with_records(super::seed::seed_documents())
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn insert(&self, record: DocumentRecord) -> Result<DocumentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("document repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: DocumentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("document repository mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = record;
        Ok(())
    }

    fn fetch(&self, id: &DocumentId) -> Result<Option<DocumentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("document repository mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<DocumentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("document repository mutex poisoned");
        Ok(guard.clone())
    }
}
