use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::model::ChapterDocument;

/// One output chapter of a split: which sections of the source it takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSplit {
    pub chapter: u32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub section_indices: Vec<usize>,
}

/// Splits one large document into several chapters by section index.
///
/// Sections may be reused across outputs; the source is left untouched.
///
/// # Errors
///
/// Returns `ContentError::SectionOutOfRange` if a plan entry names a missing section.
pub fn split_document(
    source: &ChapterDocument,
    plan: &[ChapterSplit],
) -> Result<Vec<ChapterDocument>, ContentError> {
    plan.iter()
        .map(|entry| {
            let sections = entry
                .section_indices
                .iter()
                .map(|&index| {
                    source.sections.get(index).cloned().ok_or(
                        ContentError::SectionOutOfRange {
                            index,
                            available: source.sections.len(),
                        },
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ChapterDocument {
                chapter: Some(entry.chapter),
                title: entry.title.clone(),
                description: entry.description.clone(),
                sections,
            })
        })
        .collect()
}
