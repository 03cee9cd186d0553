//! Turning raw chapter content into a flat item sequence.
//!
//! Every parser here is a pure function of its input: the same text always yields
//! the same items in the same order.

pub mod markdown;
pub mod planning;
pub mod split;
pub mod structured;

use crate::error::ContentError;
use crate::model::{Chapter, ChapterId, VisualizationCatalog};

/// Raw chapter content as fetched, tagged with its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawContent {
    /// A JSON chapter document.
    Structured(String),
    /// Markdown using `##`/`###` headings and `Definition:`/`Keywords:` lines.
    Markdown(String),
}

impl RawContent {
    #[must_use]
    pub fn format_name(&self) -> &'static str {
        match self {
            RawContent::Structured(_) => "json",
            RawContent::Markdown(_) => "markdown",
        }
    }
}

/// Parses raw content for a chapter.
///
/// # Errors
///
/// Returns `ContentError` if a structured document is malformed or if item
/// identities collide within the chapter.
pub fn parse(
    chapter: ChapterId,
    raw: &RawContent,
    catalog: &VisualizationCatalog,
) -> Result<Chapter, ContentError> {
    match raw {
        RawContent::Structured(text) => structured::parse(chapter, text),
        RawContent::Markdown(text) => markdown::parse(chapter, text, catalog),
    }
}
