use async_trait::async_trait;
use recite_core::model::ProgressIndex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
///
/// Unreadable or malformed progress is not an error: adapters report it as
/// `ProgressIndex::START`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Repository contract for the single persisted progress counter.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Last saved progress, or `ProgressIndex::START` when nothing usable is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the backend itself cannot be reached.
    async fn load_progress(&self) -> Result<ProgressIndex, StorageError>;

    /// Overwrite the stored progress. Any `u64` loads back unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value could not be written.
    async fn save_progress(&self, progress: ProgressIndex) -> Result<(), StorageError>;
}

/// In-memory repository for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<Option<ProgressIndex>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_progress(progress: ProgressIndex) -> Self {
        let repo = Self::new();
        if let Ok(mut guard) = repo.progress.lock() {
            *guard = Some(progress);
        }
        repo
    }

    /// Makes every following `save_progress` fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<ProgressIndex, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.unwrap_or(ProgressIndex::START))
    }

    async fn save_progress(&self, progress: ProgressIndex) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("simulated write failure")));
        }
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(progress);
        Ok(())
    }
}

/// Holds the progress repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn json_file(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            progress: Arc::new(crate::json_file::JsonFileRepository::new(path)),
        }
    }
}
