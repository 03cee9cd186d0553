use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use reader_core::model::ChapterId;
use services::{ProgressService, ReaderService};

pub trait UiApp: Send + Sync {
    /// Chapter to open right after launch, if any.
    fn initial_chapter(&self) -> Option<ChapterId>;

    fn reader(&self) -> Arc<ReaderService>;
    fn progress(&self) -> Arc<ProgressService>;
}

#[derive(Clone)]
pub struct AppContext {
    initial_chapter: Option<ChapterId>,
    open_initial_once: Arc<AtomicBool>,

    reader: Arc<ReaderService>,
    progress: Arc<ProgressService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let initial_chapter = app.initial_chapter();

        Self {
            initial_chapter,
            open_initial_once: Arc::new(AtomicBool::new(initial_chapter.is_some())),
            reader: app.reader(),
            progress: app.progress(),
        }
    }

    /// Returns the launch chapter the first time it is asked for, then `None`.
    #[must_use]
    pub fn take_initial_chapter(&self) -> Option<ChapterId> {
        if self.open_initial_once.swap(false, Ordering::AcqRel) {
            self.initial_chapter
        } else {
            None
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
