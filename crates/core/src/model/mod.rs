mod chapter;
mod document;
mod ids;
mod item;
mod visualization;

pub use chapter::Chapter;
pub use document::{ChapterDocument, SectionDocument, TermDocument};
pub use ids::{ChapterId, ItemId, ParseIdError, term_slug};
pub use item::{Concept, Item, ItemKind, Mastery};
pub use visualization::{Visualization, VisualizationCatalog};
