use reader_core::model::ChapterId;
use reader_core::navigation::DwellTicket;
use services::error::{ContentSourceError, ReaderError};
use services::reader::DwellEvents;
use services::{ItemView, ReaderIntent, ReaderService, ReaderSession, ReaderSnapshot};

use super::markdown_vm::markdown_to_html;
use crate::views::ViewError;

/// One card of the item list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemCardVm {
    pub index: usize,
    pub key: String,
    pub title: String,
    pub class: String,
    pub is_header: bool,
    pub definition_html: String,
    pub keywords: Vec<String>,
    pub has_demo: bool,
    pub mastery_label: String,
}

fn card_class(item: &ItemView) -> String {
    let mut class = String::from(if item.is_header {
        "section-card"
    } else {
        "term-card"
    });
    if item.active {
        class.push_str(" active");
    }
    if item.read {
        class.push_str(" read");
    }
    class
}

#[must_use]
pub fn map_item_cards(snapshot: &ReaderSnapshot) -> Vec<ItemCardVm> {
    snapshot
        .items
        .iter()
        .map(|item| ItemCardVm {
            index: item.index,
            // Header ids may repeat; the position keeps list keys unique.
            key: if item.is_header {
                format!("{}-{}", item.id, item.index)
            } else {
                item.id.clone()
            },
            title: item.title.clone(),
            class: card_class(item),
            is_header: item.is_header,
            definition_html: if item.definition.is_empty() {
                String::new()
            } else {
                markdown_to_html(&item.definition)
            },
            keywords: item.keywords.clone(),
            has_demo: item.has_visualization,
            mastery_label: format!("Mastery {}%", item.mastery),
        })
        .collect()
}

/// Open chapter as held by `run_reader`.
pub struct ReaderVm {
    session: ReaderSession,
}

impl ReaderVm {
    #[must_use]
    pub fn new(session: ReaderSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn snapshot(&self) -> ReaderSnapshot {
        self.session.view()
    }

    pub fn dispatch(&mut self, intent: ReaderIntent) -> bool {
        self.session.dispatch(intent)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the credit cannot be saved.
    pub async fn credit_dwell(&mut self, ticket: DwellTicket) -> Result<bool, ViewError> {
        self.session
            .on_dwell(ticket)
            .await
            .map_err(|_| ViewError::Unknown)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the saved progress cannot be removed.
    pub async fn reset(&mut self) -> Result<(), ViewError> {
        self.session.reset().await.map_err(|_| ViewError::Unknown)
    }
}

/// Opens `chapter` and detaches its dwell events for `run_reader` to select over.
///
/// # Errors
///
/// Returns `ViewError::ChapterNotFound` when no content exists for the chapter
/// and `ViewError::LoadFailed` for other fetch or parse failures.
pub async fn open_reader(
    reader: &ReaderService,
    chapter: ChapterId,
) -> Result<(ReaderVm, Option<DwellEvents>), ViewError> {
    let mut session = match reader.open(chapter).await {
        Ok(session) => session,
        Err(ReaderError::Source(ContentSourceError::NotFound(_))) => {
            return Err(ViewError::ChapterNotFound(chapter.value()));
        }
        Err(err) => return Err(ViewError::LoadFailed(err.to_string())),
    };
    let events = session.take_dwell_events();
    Ok((ReaderVm::new(session), events))
}
