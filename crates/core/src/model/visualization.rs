use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reference to an embeddable interactive demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visualization {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, alias = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Visualization {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            icon: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Title -> visualization wiring, injected into the parsers.
///
/// Lookups are exact on the trimmed heading title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualizationCatalog {
    entries: HashMap<String, Visualization>,
}

impl VisualizationCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from a JSON object keyed by title.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the text is not a title -> visualization object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    #[must_use]
    pub fn with_entry(mut self, title: impl Into<String>, viz: Visualization) -> Self {
        self.insert(title, viz);
        self
    }

    pub fn insert(&mut self, title: impl Into<String>, viz: Visualization) {
        self.entries.insert(title.into(), viz);
    }

    #[must_use]
    pub fn lookup(&self, title: &str) -> Option<&Visualization> {
        self.entries.get(title)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
