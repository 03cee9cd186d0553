use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chapter number, as used in content paths (`chapter3.json`) and progress keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChapterId(u32);

impl ChapterId {
    #[must_use]
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Key under which this chapter's progress record is persisted.
    #[must_use]
    pub fn progress_key(&self) -> String {
        format!("chapter-{}-progress", self.0)
    }
}

impl fmt::Debug for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChapterId({})", self.0)
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing a `ChapterId` from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse chapter number from `{}`", self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for ChapterId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(ChapterId::new)
            .map_err(|_| ParseIdError { raw: s.to_string() })
    }
}

/// Stable identity of an item within a chapter.
///
/// Progress is keyed by this value, so it must survive re-parsing the same content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identity of a section header: `section:` plus the lower-cased title with
    /// whitespace runs turned into single hyphens.
    ///
    /// Header ids only key list entries; they are never persisted.
    #[must_use]
    pub fn for_section(title: &str) -> Self {
        let joined = title
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        Self(format!("section:{joined}"))
    }

    /// Identity derived from a term title when the content does not supply one.
    #[must_use]
    pub fn for_term(title: &str) -> Self {
        Self(term_slug(title))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// URL-safe slug for a term title.
///
/// Parentheses are dropped and `/` and spaces become hyphens. Each `--` pair is
/// then halved once, left to right, and outer hyphens are trimmed. Runs of three
/// or more hyphens keep a double hyphen.
#[must_use]
pub fn term_slug(title: &str) -> String {
    title
        .to_lowercase()
        .replace(['(', ')'], "")
        .replace(['/', ' '], "-")
        .replace("--", "-")
        .trim_matches('-')
        .to_string()
}
