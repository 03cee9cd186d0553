use std::sync::Arc;

use reader_core::model::{ChapterId, Item};
use reader_core::progress::{ProgressRecord, mark_visited, percent, reset_items};
use storage::repository::{ProgressRepository, StorageError};
use tracing::{debug, error, info, warn};

use crate::Clock;
use crate::error::ProgressError;

/// What `ProgressService::load` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadedProgress {
    /// Concepts whose saved state was merged.
    pub restored: usize,
    /// Saved position, if a record existed.
    pub last_visited_index: Option<usize>,
}

/// Saved progress of a chapter that is not open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedProgress {
    pub read: usize,
    pub total: usize,
    pub percent: u8,
}

/// Persists per-chapter progress and applies the visit rules to live items.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, progress }
    }

    /// Merges the saved record for `chapter` onto `items`.
    ///
    /// Never fails: a corrupt record or an unavailable store leaves the items
    /// at their defaults and is only logged.
    pub async fn load(&self, chapter: ChapterId, items: &mut [Item]) -> LoadedProgress {
        match self.progress.get_progress(chapter).await {
            Ok(Some(record)) => {
                let restored = record.apply(items);
                debug!(%chapter, restored, "restored saved progress");
                LoadedProgress {
                    restored,
                    last_visited_index: Some(record.last_visited_index),
                }
            }
            Ok(None) => LoadedProgress::default(),
            Err(err @ StorageError::Serialization(_)) => {
                warn!(%chapter, error = %err, "ignoring unreadable progress record");
                LoadedProgress::default()
            }
            Err(err) => {
                error!(%chapter, error = %err, "failed to load progress");
                LoadedProgress::default()
            }
        }
    }

    /// Reads the saved counts for a chapter without opening it.
    ///
    /// Missing or unreadable records yield `None`.
    pub async fn saved(&self, chapter: ChapterId) -> Option<SavedProgress> {
        match self.progress.get_progress(chapter).await {
            Ok(Some(record)) => {
                let read = record.terms.iter().filter(|t| t.visited).count();
                Some(SavedProgress {
                    read,
                    total: record.total,
                    percent: percent(read, record.total),
                })
            }
            Ok(None) => None,
            Err(err) => {
                warn!(%chapter, error = %err, "saved progress unavailable");
                None
            }
        }
    }

    /// Writes the full concept state of `items`, replacing the previous record.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the write fails.
    pub async fn save(
        &self,
        chapter: ChapterId,
        items: &[Item],
        current_index: usize,
    ) -> Result<(), ProgressError> {
        let record = ProgressRecord::capture(items, current_index, self.clock.now());
        self.progress.save_progress(chapter, &record).await?;
        Ok(())
    }

    /// Credits a visit to `items[index]` and persists when it changed anything.
    ///
    /// Returns `false` for headers, already-visited concepts and out-of-range
    /// indices.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if persisting the change fails. The
    /// in-memory credit stands either way.
    pub async fn mark_visited(
        &self,
        chapter: ChapterId,
        items: &mut [Item],
        index: usize,
        current_index: usize,
    ) -> Result<bool, ProgressError> {
        let Some(item) = items.get_mut(index) else {
            return Ok(false);
        };
        if !mark_visited(item, self.clock.now()) {
            return Ok(false);
        }
        debug!(%chapter, item = %item.id, "concept visited");
        self.save(chapter, items, current_index).await?;
        Ok(true)
    }

    /// Deletes the saved record and zeroes every concept in memory.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the delete fails; memory is left
    /// untouched in that case.
    pub async fn reset(&self, chapter: ChapterId, items: &mut [Item]) -> Result<(), ProgressError> {
        self.progress.delete_progress(chapter).await?;
        reset_items(items);
        info!(%chapter, "progress reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_core::model::{Concept, ItemId};
    use reader_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn chapter_items() -> Vec<Item> {
        vec![
            Item::section("Fundamentals"),
            Item::concept(ItemId::new("token"), "Token", Concept::default()),
            Item::concept(ItemId::new("embedding"), "Embedding", Concept::default()),
        ]
    }

    fn service(repo: &InMemoryRepository) -> ProgressService {
        ProgressService::new(fixed_clock(), Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn mark_visited_persists_once() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        let chapter = ChapterId::new(1);
        let mut items = chapter_items();

        assert!(svc.mark_visited(chapter, &mut items, 1, 1).await.unwrap());
        assert!(!svc.mark_visited(chapter, &mut items, 1, 1).await.unwrap());
        assert!(!svc.mark_visited(chapter, &mut items, 0, 0).await.unwrap());
        assert!(!svc.mark_visited(chapter, &mut items, 9, 0).await.unwrap());

        let record = repo.get_progress(chapter).await.unwrap().unwrap();
        assert_eq!(record.terms[0].mastery.value(), 20);
        assert_eq!(record.total, 2);
    }

    #[tokio::test]
    async fn load_merges_saved_state() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        let chapter = ChapterId::new(1);
        let mut first = chapter_items();
        svc.mark_visited(chapter, &mut first, 2, 2).await.unwrap();

        let mut fresh = chapter_items();
        let loaded = svc.load(chapter, &mut fresh).await;
        assert_eq!(loaded.restored, 2);
        assert_eq!(loaded.last_visited_index, Some(2));
        assert!(fresh[2].is_visited());
        assert!(!fresh[1].is_visited());
    }

    #[tokio::test]
    async fn corrupt_record_falls_back_to_defaults() {
        let repo = InMemoryRepository::new();
        let chapter = ChapterId::new(1);
        repo.put_raw(chapter, "{not json").unwrap();

        let mut items = chapter_items();
        let loaded = service(&repo).load(chapter, &mut items).await;
        assert_eq!(loaded, LoadedProgress::default());
        assert!(items.iter().all(|i| !i.is_visited()));
    }

    #[tokio::test]
    async fn reset_clears_store_and_memory() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        let chapter = ChapterId::new(1);
        let mut items = chapter_items();
        svc.mark_visited(chapter, &mut items, 1, 1).await.unwrap();

        svc.reset(chapter, &mut items).await.unwrap();
        assert!(repo.get_progress(chapter).await.unwrap().is_none());
        assert!(items.iter().all(|i| !i.is_visited()));

        let mut reloaded = chapter_items();
        assert_eq!(svc.load(chapter, &mut reloaded).await.restored, 0);
    }

    #[tokio::test]
    async fn saved_reports_counts() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        let chapter = ChapterId::new(1);
        assert!(svc.saved(chapter).await.is_none());

        let mut items = chapter_items();
        svc.mark_visited(chapter, &mut items, 1, 1).await.unwrap();
        let saved = svc.saved(chapter).await.unwrap();
        assert_eq!((saved.read, saved.total, saved.percent), (1, 2, 50));

        repo.put_raw(ChapterId::new(2), "not json").unwrap();
        assert!(svc.saved(ChapterId::new(2)).await.is_none());
    }
}
