use std::ops::RangeInclusive;

use rand::Rng;

use super::domain::DocumentRecord;

/// Number of fields a successful extraction reports.
pub const FIELD_COUNT_RANGE: RangeInclusive<u8> = 3..=8;

/// Field extraction backend invoked when a document's processing delay elapses.
pub trait OcrEngine: Send + Sync {
    fn extract(&self, record: &DocumentRecord) -> Result<u8, OcrError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OcrError {
    #[error("document could not be read: {0}")]
    Unreadable(String),
    #[error("ocr backend unavailable: {0}")]
    Unavailable(String),
}

/// Stand-in engine: always succeeds with a random field count.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedOcr;

impl OcrEngine for SimulatedOcr {
    fn extract(&self, _record: &DocumentRecord) -> Result<u8, OcrError> {
        Ok(rand::thread_rng().gen_range(FIELD_COUNT_RANGE))
    }
}
