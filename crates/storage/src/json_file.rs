//! Progress kept in a small JSON record: `{"progress": <n>}`.

use std::path::PathBuf;

use async_trait::async_trait;
use recite_core::model::ProgressIndex;
use serde::Serialize;
use serde_json::Value;

use crate::repository::{ProgressRepository, StorageError};

/// Name of the only recognized field in the record.
pub const PROGRESS_FIELD: &str = "progress";

/// Default file name, relative to the working directory.
pub const DEFAULT_PROGRESS_FILE: &str = "memory_progress.json";

#[derive(Serialize)]
struct ProgressRecord {
    progress: u64,
}

#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_PROGRESS_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Reads the progress field out of raw file contents.
///
/// Anything other than a non-negative integer under `progress` counts as
/// no progress.
#[must_use]
pub fn parse_progress(raw: &str) -> ProgressIndex {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(%err, "progress file is not valid JSON, starting over");
            return ProgressIndex::START;
        }
    };
    match value.get(PROGRESS_FIELD).and_then(Value::as_u64) {
        Some(progress) => ProgressIndex::new(progress),
        None => {
            tracing::debug!("progress field missing or not an integer");
            ProgressIndex::START
        }
    }
}

#[async_trait]
impl ProgressRepository for JsonFileRepository {
    async fn load_progress(&self) -> Result<ProgressIndex, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(parse_progress(&raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no progress file yet");
                Ok(ProgressIndex::START)
            }
            Err(err) if err.kind() == std::io::ErrorKind::InvalidData => {
                tracing::warn!(path = %self.path.display(), %err, "progress file unreadable");
                Ok(ProgressIndex::START)
            }
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    async fn save_progress(&self, progress: ProgressIndex) -> Result<(), StorageError> {
        let body = serde_json::to_vec(&ProgressRecord {
            progress: progress.value(),
        })
        .map_err(|err| StorageError::Serialization(err.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Write beside the target, then rename over it.
        let temp = self.temp_path();
        tokio::fs::write(&temp, body).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        tracing::debug!(path = %self.path.display(), progress = progress.value(), "progress saved");
        Ok(())
    }
}
