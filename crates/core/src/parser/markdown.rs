use std::sync::LazyLock;

use regex::Regex;

use crate::error::ContentError;
use crate::model::{Chapter, ChapterId, Concept, Item, ItemId, VisualizationCatalog};

static CHAPTER_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s+(.+)$").expect("valid chapter title pattern"));
static MAJOR_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s+(.+)$").expect("valid major heading pattern"));
static MINOR_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###\s+(.+)$").expect("valid minor heading pattern"));

const DEFINITION_MARKER: &str = "Definition:";
const KEYWORDS_MARKER: &str = "Keywords:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenKind {
    Section,
    Concept,
}

/// The item currently collecting lines.
#[derive(Debug)]
struct OpenItem {
    kind: OpenKind,
    title: String,
    body: String,
    definition: String,
    keywords: Option<Vec<String>>,
    concept: Concept,
}

impl OpenItem {
    fn new(kind: OpenKind, title: &str) -> Self {
        Self {
            kind,
            title: title.trim().to_string(),
            body: String::new(),
            definition: String::new(),
            keywords: None,
            concept: Concept::default(),
        }
    }

    fn push_line(&mut self, line: &str) {
        self.body.push_str(line);
        self.body.push('\n');

        if let Some(rest) = line.strip_prefix(DEFINITION_MARKER) {
            self.definition = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(KEYWORDS_MARKER) {
            self.keywords = Some(split_keywords(rest));
        } else if !self.definition.is_empty() && self.keywords.is_none() && !line.trim().is_empty()
        {
            self.definition.push(' ');
            self.definition.push_str(line.trim());
        }
    }

    fn finish(self) -> Item {
        let mut item = match self.kind {
            OpenKind::Section => Item::section(self.title),
            OpenKind::Concept => {
                let concept = Concept {
                    definition: self.definition,
                    keywords: self.keywords.unwrap_or_default(),
                    ..self.concept
                };
                Item::concept(ItemId::for_term(&self.title), self.title, concept)
            }
        };
        item.body = self.body;
        item
    }
}

fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn capture<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// Scans markdown into items, one pass, line by line.
///
/// `##` opens a section header, `###` opens a concept whose title is looked up in
/// `catalog`. Anything before the first heading is dropped, except a leading
/// `# Title` line, which names the chapter.
#[must_use]
pub fn parse_items(text: &str, catalog: &VisualizationCatalog) -> (Option<String>, Vec<Item>) {
    let mut items = Vec::new();
    let mut open: Option<OpenItem> = None;
    let mut chapter_title = None;

    for line in text.lines() {
        if let Some(title) = capture(&MAJOR_HEADING, line) {
            items.extend(open.take().map(OpenItem::finish));
            open = Some(OpenItem::new(OpenKind::Section, title));
        } else if let Some(title) = capture(&MINOR_HEADING, line) {
            items.extend(open.take().map(OpenItem::finish));
            let mut next = OpenItem::new(OpenKind::Concept, title);
            next.concept.visualization = catalog.lookup(&next.title).cloned();
            open = Some(next);
        } else if let Some(current) = open.as_mut() {
            current.push_line(line);
        } else if chapter_title.is_none() {
            chapter_title = capture(&CHAPTER_TITLE, line).map(str::to_string);
        }
    }
    items.extend(open.map(OpenItem::finish));

    (chapter_title, items)
}

/// Parses a markdown chapter.
///
/// # Errors
///
/// Returns `ContentError::DuplicateItemId` when two concept headings produce the same identity.
pub fn parse(
    chapter: ChapterId,
    text: &str,
    catalog: &VisualizationCatalog,
) -> Result<Chapter, ContentError> {
    let (title, items) = parse_items(text, catalog);
    let title = title.unwrap_or_else(|| format!("Chapter {chapter}"));
    Chapter::new(chapter, title, None, items)
}
