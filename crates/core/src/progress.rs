//! Progress rules: visiting concepts, persisted snapshots, and derived counts.
//!
//! Section headers never take part in any of this. Only concepts are counted,
//! credited, or persisted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Item, ItemId, Mastery};

//
// ─── RULES ─────────────────────────────────────────────────────────────────────
//

/// Credits a visit to `item`.
///
/// An unvisited concept becomes visited, gains one mastery step (capped) and is
/// stamped with `now`. Returns `false`, changing nothing, for headers and for
/// concepts that are already visited.
pub fn mark_visited(item: &mut Item, now: DateTime<Utc>) -> bool {
    let Some(concept) = item.as_concept_mut() else {
        return false;
    };
    if concept.visited {
        return false;
    }
    concept.visited = true;
    concept.mastery = concept.mastery.bumped();
    concept.last_visited = Some(now);
    true
}

/// Clears visited state and mastery on every concept.
pub fn reset_items(items: &mut [Item]) {
    for concept in items.iter_mut().filter_map(Item::as_concept_mut) {
        concept.visited = false;
        concept.mastery = Mastery::default();
        concept.last_visited = None;
    }
}

//
// ─── PERSISTED RECORD ──────────────────────────────────────────────────────────
//

/// Persisted state of one concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermProgress {
    pub id: ItemId,
    #[serde(default)]
    pub visited: bool,
    #[serde(default)]
    pub mastery: Mastery,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_visited: Option<DateTime<Utc>>,
}

/// Per-chapter progress snapshot, rewritten in full on every change.
///
/// JSON shape: `{ terms: [{id, visited, mastery, lastVisited}], total, lastVisitedIndex, timestamp }`
/// with times in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default)]
    pub terms: Vec<TermProgress>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub last_visited_index: usize,
    #[serde(default, with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl ProgressRecord {
    /// Snapshots the concept state of `items`.
    #[must_use]
    pub fn capture(items: &[Item], current_index: usize, now: DateTime<Utc>) -> Self {
        let terms: Vec<TermProgress> = items
            .iter()
            .filter_map(|item| {
                item.as_concept().map(|c| TermProgress {
                    id: item.id.clone(),
                    visited: c.visited,
                    mastery: c.mastery,
                    last_visited: c.last_visited,
                })
            })
            .collect();

        Self {
            total: terms.len(),
            terms,
            last_visited_index: current_index,
            timestamp: now,
        }
    }

    /// Merges saved state onto `items` by identity.
    ///
    /// Saved entries with no matching concept are ignored, and concepts with no
    /// saved entry keep what they have. Returns how many concepts were restored.
    pub fn apply(&self, items: &mut [Item]) -> usize {
        let positions: HashMap<&ItemId, usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_concept())
            .map(|(index, item)| (&item.id, index))
            .collect();

        let matched: Vec<(usize, &TermProgress)> = self
            .terms
            .iter()
            .filter_map(|saved| positions.get(&saved.id).map(|&index| (index, saved)))
            .collect();

        for (index, saved) in &matched {
            if let Some(concept) = items[*index].as_concept_mut() {
                concept.visited = saved.visited;
                concept.mastery = saved.mastery;
                concept.last_visited = saved.last_visited;
            }
        }
        matched.len()
    }

    /// Decodes a persisted payload.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for corrupt or foreign payloads.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Encodes the record for persistence.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

/// Counts shown in the progress indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    /// Visited concepts.
    pub read: usize,
    /// All concepts.
    pub total: usize,
    /// `round(100 * read / total)`, or 0 when there are no concepts.
    pub percent: u8,
    /// 1-based concept number of the current item; for a header, the number of
    /// concepts before it.
    pub position: usize,
}

impl ProgressSummary {
    #[must_use]
    pub fn from_items(items: &[Item], current: Option<usize>) -> Self {
        let total = items.iter().filter(|i| i.is_concept()).count();
        let read = items.iter().filter(|i| i.is_visited()).count();

        let position = current.filter(|&i| i < items.len()).map_or(0, |index| {
            let before = items[..index].iter().filter(|i| i.is_concept()).count();
            if items[index].is_concept() {
                before + 1
            } else {
                before
            }
        });

        Self {
            read,
            total,
            percent: percent(read, total),
            position,
        }
    }

    #[must_use]
    pub fn percent_label(&self) -> String {
        format!("{}%", self.percent)
    }
}

/// Rounded percentage, half rounding up; 0 for an empty denominator.
#[must_use]
pub fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (part.min(total) * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}
