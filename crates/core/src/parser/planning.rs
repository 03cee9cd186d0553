//! Converter for planning documents: numbered section lines followed by term
//! blocks, turned into a structured [`ChapterDocument`].
//!
//! ```text
//! 1. Core Concepts
//! Token
//! Definition: The smallest unit of text a model reads.
//! Keywords: text, unit
//!
//! 2) Generation Controls
//! Temperature
//! Definition: Controls randomness.
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{ChapterDocument, SectionDocument, TermDocument, VisualizationCatalog, term_slug};

static SECTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[\).]\s+(.*)$").expect("valid section line pattern"));

const DEFINITION_MARKER: &str = "Definition:";
const KEYWORDS_MARKER: &str = "Keywords:";

/// Chapter metadata supplied by the caller; the planning text only holds sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningMeta {
    pub chapter: u32,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TermState {
    /// Title seen, waiting for a definition or keywords.
    Titled,
    /// Inside a definition; consecutive lines continue it.
    Defining,
    /// Keywords seen or the definition ended on a blank line.
    Closed,
}

fn new_term(title: &str, catalog: &VisualizationCatalog) -> TermDocument {
    let title = title.trim().to_string();
    let viz = catalog.lookup(&title);
    TermDocument {
        id: Some(term_slug(&title)),
        definition: Some(String::new()),
        keywords: Some(Vec::new()),
        has_viz: viz.is_some(),
        viz_path: viz.map(|v| v.path.clone()),
        viz_icon: viz.and_then(|v| v.icon.clone()),
        mastery: Some(0),
        visited: false,
        title,
    }
}

/// Converts planning text into a chapter document.
///
/// Lines before the first numbered section are ignored. A blank line ends a
/// multi-line definition; the next plain line then starts a new term.
#[must_use]
pub fn parse_planning(
    text: &str,
    meta: &PlanningMeta,
    catalog: &VisualizationCatalog,
) -> ChapterDocument {
    let mut sections: Vec<SectionDocument> = Vec::new();
    let mut state = TermState::Closed;

    for raw in text.lines() {
        let line = raw.trim_end();

        if let Some(caps) = SECTION_LINE.captures(line) {
            let title = caps.get(1).map_or("", |m| m.as_str()).trim();
            sections.push(SectionDocument::new(title));
            state = TermState::Closed;
            continue;
        }

        let Some(section) = sections.last_mut() else {
            continue;
        };

        if line.trim().is_empty() {
            if state == TermState::Defining {
                state = TermState::Closed;
            }
            continue;
        }

        // Marker lines without an open term carry nothing to attach to.
        let open_term = if state == TermState::Closed {
            None
        } else {
            section.terms.last_mut()
        };

        if let Some(rest) = line.strip_prefix(DEFINITION_MARKER) {
            if let Some(term) = open_term {
                term.definition = Some(rest.trim().to_string());
                state = TermState::Defining;
            }
        } else if let Some(rest) = line.strip_prefix(KEYWORDS_MARKER) {
            if let Some(term) = open_term {
                term.keywords = Some(
                    rest.split(',')
                        .map(str::trim)
                        .filter(|k| !k.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
                state = TermState::Closed;
            }
        } else if let (TermState::Defining, Some(term)) = (state, open_term) {
            let definition = term.definition.get_or_insert_with(String::new);
            if !definition.is_empty() {
                definition.push(' ');
            }
            definition.push_str(line.trim());
        } else {
            section.terms.push(new_term(line, catalog));
            state = TermState::Titled;
        }
    }

    ChapterDocument {
        chapter: Some(meta.chapter),
        title: meta.title.clone(),
        description: meta.description.clone(),
        sections,
    }
}
