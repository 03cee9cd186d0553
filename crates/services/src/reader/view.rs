use reader_core::model::{ChapterId, Item, ItemKind};
use reader_core::panel::{PanelDisplay, VisualizationPanel};
use reader_core::progress::ProgressSummary;

/// One row of the item list as the view renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub is_header: bool,
    pub definition: String,
    pub keywords: Vec<String>,
    pub has_visualization: bool,
    pub mastery: u8,
    pub active: bool,
    pub read: bool,
}

impl ItemView {
    fn project(index: usize, item: &Item, current: Option<usize>) -> Self {
        let active = current == Some(index);
        match &item.kind {
            ItemKind::SectionHeader => Self {
                index,
                id: item.id.to_string(),
                title: item.title.clone(),
                is_header: true,
                definition: String::new(),
                keywords: Vec::new(),
                has_visualization: false,
                mastery: 0,
                active,
                read: false,
            },
            ItemKind::Concept(concept) => Self {
                index,
                id: item.id.to_string(),
                title: item.title.clone(),
                is_header: false,
                definition: concept.definition.clone(),
                keywords: concept.keywords.clone(),
                has_visualization: concept.has_visualization(),
                mastery: concept.mastery.value(),
                active,
                read: concept.visited,
            },
        }
    }
}

/// Visualization panel state as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub open: bool,
    pub display: PanelDisplay,
    pub compact_showing: bool,
}

impl From<&VisualizationPanel> for PanelView {
    fn from(panel: &VisualizationPanel) -> Self {
        Self {
            open: panel.is_open(),
            display: panel.display().clone(),
            compact_showing: panel.compact_showing(),
        }
    }
}

/// Everything the reader view needs, derived from session state.
///
/// A pure projection; rebuilt after every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderSnapshot {
    pub chapter: ChapterId,
    pub title: String,
    pub description: Option<String>,
    pub items: Vec<ItemView>,
    pub current: Option<usize>,
    pub summary: ProgressSummary,
    pub panel: PanelView,
    /// Whether the compact-layout toggle does anything for the current item.
    pub can_toggle_compact: bool,
}

impl ReaderSnapshot {
    #[must_use]
    pub fn project(
        chapter: ChapterId,
        title: &str,
        description: Option<&str>,
        items: &[Item],
        current: Option<usize>,
        panel: &VisualizationPanel,
    ) -> Self {
        let can_toggle_compact = current
            .and_then(|i| items.get(i))
            .is_some_and(|item| item.visualization().is_some());

        Self {
            chapter,
            title: title.to_string(),
            description: description.map(ToString::to_string),
            items: items
                .iter()
                .enumerate()
                .map(|(index, item)| ItemView::project(index, item, current))
                .collect(),
            current,
            summary: ProgressSummary::from_items(items, current),
            panel: PanelView::from(panel),
            can_toggle_compact,
        }
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&ItemView> {
        self.current.and_then(|i| self.items.get(i))
    }

    /// `position / total`, counting concepts only.
    #[must_use]
    pub fn position_label(&self) -> String {
        format!("{} / {}", self.summary.position, self.summary.total)
    }

    /// Breadcrumb heading, e.g. `Module 2: Prompting`.
    #[must_use]
    pub fn heading(&self) -> String {
        format!("Module {}: {}", self.chapter, self.title)
    }
}
