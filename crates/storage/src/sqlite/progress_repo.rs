use async_trait::async_trait;
use recite_core::model::ProgressIndex;
use sqlx::Row;

use crate::json_file::PROGRESS_FIELD;
use crate::repository::{ProgressRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self) -> Result<ProgressIndex, StorageError> {
        let row = sqlx::query("SELECT CAST(value AS TEXT) AS value FROM progress WHERE key = ?1")
            .bind(PROGRESS_FIELD)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(ProgressIndex::START);
        };

        let value: Option<String> = row.try_get("value").ok();
        match value.and_then(|v| v.trim().parse::<u64>().ok()) {
            Some(value) => Ok(ProgressIndex::new(value)),
            None => {
                tracing::warn!("stored progress is not a non-negative integer, starting over");
                Ok(ProgressIndex::START)
            }
        }
    }

    async fn save_progress(&self, progress: ProgressIndex) -> Result<(), StorageError> {
        let value = progress.value().to_string();

        sqlx::query(
            r"
            INSERT INTO progress (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
        )
        .bind(PROGRESS_FIELD)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
