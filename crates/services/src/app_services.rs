use std::sync::Arc;

use reader_core::model::VisualizationCatalog;
use storage::repository::Storage;

use crate::Clock;
use crate::content::{ContentSource, source_for};
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::reader::{ReaderService, ReaderSettings};

/// Assembles app-facing services.
#[derive(Clone)]
pub struct AppServices {
    reader: Arc<ReaderService>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the content at `content_location`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the content
    /// location is not usable.
    pub async fn new_sqlite(
        db_url: &str,
        content_location: &str,
        clock: Clock,
        catalog: VisualizationCatalog,
        settings: ReaderSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let source = source_for(content_location)?;
        Ok(Self::from_parts(storage, source, clock, catalog, settings))
    }

    /// Build services from already constructed storage and content.
    #[must_use]
    pub fn from_parts(
        storage: Storage,
        source: Arc<dyn ContentSource>,
        clock: Clock,
        catalog: VisualizationCatalog,
        settings: ReaderSettings,
    ) -> Self {
        let progress = ProgressService::new(clock, Arc::clone(&storage.progress));
        let reader = Arc::new(ReaderService::new(
            source,
            progress.clone(),
            Arc::new(catalog),
            settings,
        ));
        Self {
            reader,
            progress: Arc::new(progress),
        }
    }

    #[must_use]
    pub fn reader(&self) -> Arc<ReaderService> {
        Arc::clone(&self.reader)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
