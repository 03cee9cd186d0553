use reader_core::model::{ChapterId, Item};
use reader_core::navigation::{Activation, DwellTicket, NavigationController};
use reader_core::panel::VisualizationPanel;
use tracing::debug;

use super::dwell::{self, DwellEvents, DwellTimer};
use super::intent::ReaderIntent;
use super::service::ReaderSettings;
use super::view::ReaderSnapshot;
use crate::error::ReaderError;
use crate::progress_service::ProgressService;

/// A learner's open chapter.
///
/// Owns the items, the current position, the visualization panel and the
/// dwell timer. Commands are applied one at a time in the order they arrive.
pub struct ReaderSession {
    chapter: ChapterId,
    title: String,
    description: Option<String>,
    items: Vec<Item>,
    nav: NavigationController,
    panel: VisualizationPanel,
    timer: DwellTimer,
    events: Option<DwellEvents>,
    progress: ProgressService,
}

impl ReaderSession {
    pub(crate) fn new(
        chapter: ChapterId,
        title: String,
        description: Option<String>,
        items: Vec<Item>,
        progress: ProgressService,
        settings: &ReaderSettings,
    ) -> Self {
        let (timer, events) = dwell::channel(settings.dwell);
        Self {
            chapter,
            title,
            description,
            items,
            nav: NavigationController::new(),
            panel: VisualizationPanel::new(),
            timer,
            events: Some(events),
            progress,
        }
    }

    #[must_use]
    pub fn chapter(&self) -> ChapterId {
        self.chapter
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.nav.current()
    }

    #[must_use]
    pub fn panel(&self) -> &VisualizationPanel {
        &self.panel
    }

    #[must_use]
    pub fn dwell_pending(&self) -> bool {
        self.nav.pending_dwell().is_some() && self.timer.is_pending()
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Makes `index` current. Out-of-range indices are ignored.
    pub fn activate(&mut self, index: usize) -> bool {
        let activation = self.nav.activate(index, &self.items);
        self.after_activation(activation)
    }

    pub fn next(&mut self) -> bool {
        let activation = self.nav.next(&self.items);
        self.after_activation(activation)
    }

    pub fn prev(&mut self) -> bool {
        let activation = self.nav.prev(&self.items);
        self.after_activation(activation)
    }

    fn after_activation(&mut self, activation: Option<Activation>) -> bool {
        let Some(activation) = activation else {
            return false;
        };

        self.timer.cancel();
        self.panel.reset_compact();

        let item = &self.items[activation.index];
        match item.visualization() {
            Some(viz) => self.panel.show(viz.path.clone(), item.title.clone()),
            None => self.panel.show_placeholder(),
        }

        if let Some(ticket) = activation.dwell {
            self.timer.start(ticket);
        }
        debug!(chapter = %self.chapter, index = activation.index, "item activated");
        true
    }

    //
    // ─── PANEL ─────────────────────────────────────────────────────────────────
    //

    pub fn toggle_panel(&mut self) -> bool {
        self.panel.toggle_open()
    }

    pub fn close_panel(&mut self) {
        self.panel.close();
    }

    /// Flips the compact-layout viewer; only items with a visualization flip it.
    pub fn toggle_compact(&mut self) -> bool {
        let has_viz = self
            .nav
            .current()
            .and_then(|i| self.items.get(i))
            .is_some_and(|item| item.visualization().is_some());
        self.panel.toggle_compact(has_viz)
    }

    /// Loads the visualization of `items[index]` without moving the position.
    pub fn open_visualization(&mut self, index: usize) -> bool {
        let Some(item) = self.items.get(index) else {
            return false;
        };
        let Some(viz) = item.visualization() else {
            return false;
        };
        self.panel.show(viz.path.clone(), item.title.clone());
        true
    }

    /// Applies a synchronous command. Returns whether anything changed.
    pub fn dispatch(&mut self, intent: ReaderIntent) -> bool {
        match intent {
            ReaderIntent::Next => self.next(),
            ReaderIntent::Prev => self.prev(),
            ReaderIntent::Activate(index) => self.activate(index),
            ReaderIntent::TogglePanel => {
                self.toggle_panel();
                true
            }
            ReaderIntent::ClosePanel => {
                self.close_panel();
                true
            }
            ReaderIntent::ToggleCompact => {
                let before = self.panel.compact_showing();
                self.toggle_compact() != before
            }
            ReaderIntent::OpenVisualization(index) => self.open_visualization(index),
        }
    }

    //
    // ─── PROGRESS ──────────────────────────────────────────────────────────────
    //

    /// Credits a fired dwell ticket. Stale tickets are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Progress` if persisting the credit fails.
    pub async fn on_dwell(&mut self, ticket: DwellTicket) -> Result<bool, ReaderError> {
        let Some(index) = self.nav.accept_dwell(ticket) else {
            debug!(chapter = %self.chapter, index = ticket.index(), "stale dwell ignored");
            return Ok(false);
        };
        let current = self.nav.current().unwrap_or(index);
        let credited = self
            .progress
            .mark_visited(self.chapter, &mut self.items, index, current)
            .await?;
        Ok(credited)
    }

    /// Waits for the session's next elapsed dwell ticket.
    ///
    /// Returns `None` if the event stream was handed out with
    /// `take_dwell_events`.
    pub async fn next_dwell(&mut self) -> Option<DwellTicket> {
        match self.events.as_mut() {
            Some(events) => events.recv().await,
            None => None,
        }
    }

    /// Hands the dwell event stream to a caller that drives the session from
    /// outside, e.g. a UI task holding the session behind a lock.
    pub fn take_dwell_events(&mut self) -> Option<DwellEvents> {
        self.events.take()
    }

    /// Forgets all progress for the chapter and returns to the first item.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Progress` if the stored record cannot be deleted.
    pub async fn reset(&mut self) -> Result<(), ReaderError> {
        self.timer.cancel();
        self.nav.cancel_dwell();
        self.progress.reset(self.chapter, &mut self.items).await?;
        self.activate(0);
        Ok(())
    }

    #[must_use]
    pub fn view(&self) -> ReaderSnapshot {
        ReaderSnapshot::project(
            self.chapter,
            &self.title,
            self.description.as_deref(),
            &self.items,
            self.nav.current(),
            &self.panel,
        )
    }
}
