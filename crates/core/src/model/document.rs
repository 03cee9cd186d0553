use serde::{Deserialize, Serialize};

/// Structured chapter document, as stored in `data/chapter{n}.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<u32>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub sections: Vec<SectionDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDocument {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub title: String,
    #[serde(default)]
    pub terms: Vec<TermDocument>,
}

impl SectionDocument {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            kind: Some("section".to_string()),
            title: title.into(),
            terms: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermDocument {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub has_viz: bool,
    #[serde(default)]
    pub viz_path: Option<String>,
    #[serde(default)]
    pub viz_icon: Option<String>,
    #[serde(default)]
    pub mastery: Option<u32>,
    #[serde(default)]
    pub visited: bool,
}

impl ChapterDocument {
    /// Parses a chapter document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the text does not match the document shape.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Pretty JSON, the format the authoring tools write.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[must_use]
    pub fn term_count(&self) -> usize {
        self.sections.iter().map(|s| s.terms.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document_with_defaults() {
        let doc = ChapterDocument::from_json(
            r#"{"title": "Basics", "sections": [{"title": "Intro", "terms": [{"title": "Token"}]}]}"#,
        )
        .unwrap();
        assert_eq!(doc.title, "Basics");
        assert_eq!(doc.term_count(), 1);
        let term = &doc.sections[0].terms[0];
        assert!(term.id.is_none());
        assert!(!term.has_viz);
        assert!(term.keywords.is_none());
    }

    #[test]
    fn parses_camel_case_viz_fields() {
        let doc = ChapterDocument::from_json(
            r#"{"chapter": 1, "title": "T", "sections": [{"type": "section", "title": "S", "terms": [
                {"id": "token", "title": "Token", "hasViz": true, "vizPath": "visuals/tokens.html",
                 "vizIcon": null, "mastery": 0, "visited": false, "question": null}
            ]}]}"#,
        )
        .unwrap();
        let term = &doc.sections[0].terms[0];
        assert!(term.has_viz);
        assert_eq!(term.viz_path.as_deref(), Some("visuals/tokens.html"));
        assert_eq!(doc.chapter, Some(1));
    }
}
