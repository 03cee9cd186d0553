use async_trait::async_trait;
use reader_core::model::ChapterId;
use reader_core::progress::ProgressRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    /// The stored payload exists but cannot be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    #[must_use]
    pub fn is_corrupt_payload(&self) -> bool {
        matches!(self, StorageError::Serialization(_))
    }
}

/// Durable home of per-chapter progress records.
///
/// One record per chapter; saving replaces whatever was stored before.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the saved record for a chapter, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored payload is corrupt, or
    /// other storage errors.
    async fn get_progress(&self, chapter: ChapterId) -> Result<Option<ProgressRecord>, StorageError>;

    /// Replace the record for a chapter.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_progress(
        &self,
        chapter: ChapterId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError>;

    /// Remove the record for a chapter. Removing a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn delete_progress(&self, chapter: ChapterId) -> Result<(), StorageError>;
}

pub(crate) fn encode(record: &ProgressRecord) -> Result<String, StorageError> {
    record
        .to_json()
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn decode(payload: &str) -> Result<ProgressRecord, StorageError> {
    ProgressRecord::from_json(payload).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Key-value repository held in memory, for tests and prototyping.
///
/// Payloads are kept as JSON text under the chapter's progress key, the same
/// shape a browser key-value store would hold.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw payload, bypassing encoding. Useful to plant corrupt data.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(&self, chapter: ChapterId, payload: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(chapter.progress_key(), payload.into());
        Ok(())
    }

    /// Returns the raw payload stored for a chapter.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn get_raw(&self, chapter: ChapterId) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&chapter.progress_key()).cloned())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self, chapter: ChapterId) -> Result<Option<ProgressRecord>, StorageError> {
        self.get_raw(chapter)?.as_deref().map(decode).transpose()
    }

    async fn save_progress(
        &self,
        chapter: ChapterId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let payload = encode(record)?;
        self.put_raw(chapter, payload)
    }

    async fn delete_progress(&self, chapter: ChapterId) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&chapter.progress_key());
        Ok(())
    }
}

/// Repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}
