use reader_core::model::ChapterId;
use reader_core::progress::ProgressRecord;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{ProgressRepository, StorageError, decode, encode};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(&self, chapter: ChapterId) -> Result<Option<ProgressRecord>, StorageError> {
        let row = sqlx::query("SELECT payload FROM chapter_progress WHERE chapter_key = ?1")
            .bind(chapter.progress_key())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let payload: String = row.try_get("payload").map_err(conn)?;
        decode(&payload).map(Some)
    }

    async fn save_progress(
        &self,
        chapter: ChapterId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let payload = encode(record)?;

        sqlx::query(
            r"
            INSERT INTO chapter_progress (chapter_key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(chapter_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            ",
        )
        .bind(chapter.progress_key())
        .bind(payload)
        .bind(record.timestamp)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn delete_progress(&self, chapter: ChapterId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM chapter_progress WHERE chapter_key = ?1")
            .bind(chapter.progress_key())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
