use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::ItemId;
use crate::model::visualization::Visualization;

//
// ─── MASTERY ───────────────────────────────────────────────────────────────────
//

/// Per-concept mastery score in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Mastery(u8);

impl Mastery {
    /// Amount granted for one qualifying visit.
    pub const STEP: u8 = 20;
    pub const MAX: u8 = 100;

    /// Builds a score, clamping anything above `MAX`.
    #[must_use]
    pub fn new(value: u32) -> Self {
        let clamped = value.min(u32::from(Self::MAX));
        Self(u8::try_from(clamped).unwrap_or(Self::MAX))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Score after one more qualifying visit.
    #[must_use]
    pub fn bumped(self) -> Self {
        Self(self.0.saturating_add(Self::STEP).min(Self::MAX))
    }
}

impl From<u32> for Mastery {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Mastery> for u32 {
    fn from(value: Mastery) -> Self {
        u32::from(value.0)
    }
}

//
// ─── ITEMS ─────────────────────────────────────────────────────────────────────
//

/// A leaf content unit that carries progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Concept {
    pub definition: String,
    pub keywords: Vec<String>,
    pub visualization: Option<Visualization>,
    pub visited: bool,
    pub mastery: Mastery,
    pub last_visited: Option<DateTime<Utc>>,
}

impl Concept {
    #[must_use]
    pub fn has_visualization(&self) -> bool {
        self.visualization.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    SectionHeader,
    Concept(Concept),
}

/// One node of a chapter's flattened content sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Raw lines gathered under the heading (markdown input only).
    pub body: String,
    pub kind: ItemKind,
}

impl Item {
    #[must_use]
    pub fn section(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: ItemId::for_section(&title),
            title,
            body: String::new(),
            kind: ItemKind::SectionHeader,
        }
    }

    #[must_use]
    pub fn concept(id: ItemId, title: impl Into<String>, concept: Concept) -> Self {
        Self {
            id,
            title: title.into(),
            body: String::new(),
            kind: ItemKind::Concept(concept),
        }
    }

    #[must_use]
    pub fn is_concept(&self) -> bool {
        matches!(self.kind, ItemKind::Concept(_))
    }

    #[must_use]
    pub fn as_concept(&self) -> Option<&Concept> {
        match &self.kind {
            ItemKind::Concept(c) => Some(c),
            ItemKind::SectionHeader => None,
        }
    }

    pub fn as_concept_mut(&mut self) -> Option<&mut Concept> {
        match &mut self.kind {
            ItemKind::Concept(c) => Some(c),
            ItemKind::SectionHeader => None,
        }
    }

    /// Visualization attached to this item, if it is a concept that has one.
    #[must_use]
    pub fn visualization(&self) -> Option<&Visualization> {
        self.as_concept().and_then(|c| c.visualization.as_ref())
    }

    #[must_use]
    pub fn is_visited(&self) -> bool {
        self.as_concept().is_some_and(|c| c.visited)
    }
}
