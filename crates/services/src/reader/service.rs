use std::sync::Arc;
use std::time::Duration;

use reader_core::model::{ChapterId, VisualizationCatalog};
use reader_core::parser;
use tracing::info;

use super::dwell::DEFAULT_DWELL;
use super::session::ReaderSession;
use crate::content::ContentSource;
use crate::error::ReaderError;
use crate::progress_service::ProgressService;

/// Tunables for reader sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderSettings {
    /// Time a concept must stay active to count as read.
    pub dwell: Duration,
    /// Start at the saved position instead of the first item.
    pub resume_last_position: bool,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            dwell: DEFAULT_DWELL,
            resume_last_position: false,
        }
    }
}

/// Opens chapters into reader sessions.
#[derive(Clone)]
pub struct ReaderService {
    source: Arc<dyn ContentSource>,
    progress: ProgressService,
    catalog: Arc<VisualizationCatalog>,
    settings: ReaderSettings,
}

impl ReaderService {
    #[must_use]
    pub fn new(
        source: Arc<dyn ContentSource>,
        progress: ProgressService,
        catalog: Arc<VisualizationCatalog>,
        settings: ReaderSettings,
    ) -> Self {
        Self {
            source,
            progress,
            catalog,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> ReaderSettings {
        self.settings
    }

    /// Fetches, parses and restores a chapter, then activates its first item
    /// (or the saved position when resuming is enabled).
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Source` if the content cannot be fetched and
    /// `ReaderError::Content` if it cannot be parsed. Unreadable saved progress
    /// is not an error.
    pub async fn open(&self, chapter: ChapterId) -> Result<ReaderSession, ReaderError> {
        let raw = self.source.fetch(chapter).await?;
        let parsed = parser::parse(chapter, &raw, &self.catalog)?;

        let title = parsed.title().to_string();
        let description = parsed.description().map(ToString::to_string);
        let mut items = parsed.into_items();
        let loaded = self.progress.load(chapter, &mut items).await;
        info!(
            %chapter,
            format = raw.format_name(),
            items = items.len(),
            restored = loaded.restored,
            "chapter opened"
        );

        let start = if self.settings.resume_last_position {
            loaded
                .last_visited_index
                .filter(|&index| index < items.len())
                .unwrap_or(0)
        } else {
            0
        };

        let mut session = ReaderSession::new(
            chapter,
            title,
            description,
            items,
            self.progress.clone(),
            &self.settings,
        );
        session.activate(start);
        Ok(session)
    }

    /// Chapters the content source can enumerate.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Source` if listing fails.
    pub async fn list_chapters(&self) -> Result<Vec<ChapterId>, ReaderError> {
        Ok(self.source.list_chapters().await?)
    }
}
