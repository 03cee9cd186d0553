use std::collections::HashSet;

use crate::error::ContentError;
use crate::model::ids::ChapterId;
use crate::model::item::Item;

/// A parsed chapter: its title and the flattened item sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    id: ChapterId,
    title: String,
    description: Option<String>,
    items: Vec<Item>,
}

impl Chapter {
    /// Builds a chapter, rejecting duplicate concept identities.
    ///
    /// Only concept ids key saved progress, so headers are left out of the check.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::DuplicateItemId` when two concepts share an id.
    pub fn new(
        id: ChapterId,
        title: impl Into<String>,
        description: Option<String>,
        items: Vec<Item>,
    ) -> Result<Self, ContentError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in items.iter().filter(|item| item.is_concept()) {
            if !seen.insert(item.id.as_str()) {
                return Err(ContentError::DuplicateItemId(item.id.to_string()));
            }
        }

        Ok(Self {
            id,
            title: title.into(),
            description,
            items,
        })
    }

    #[must_use]
    pub fn id(&self) -> ChapterId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn concept_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_concept()).count()
    }

    /// Splits the chapter into its metadata and owned items.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}
