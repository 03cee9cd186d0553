use crate::error::ContentError;
use crate::model::{
    Chapter, ChapterDocument, ChapterId, Concept, Item, ItemId, Mastery, TermDocument,
    Visualization,
};

/// Parses and flattens a JSON chapter document.
///
/// # Errors
///
/// Returns `ContentError::Json` for malformed JSON and
/// `ContentError::DuplicateItemId` for colliding identities.
pub fn parse(chapter: ChapterId, text: &str) -> Result<Chapter, ContentError> {
    let doc = ChapterDocument::from_json(text)?;
    from_document(chapter, doc)
}

/// Flattens a document into one header per section followed by its terms.
///
/// # Errors
///
/// Returns `ContentError::DuplicateItemId` for colliding identities.
pub fn from_document(chapter: ChapterId, doc: ChapterDocument) -> Result<Chapter, ContentError> {
    let items = flatten(&doc);
    Chapter::new(chapter, doc.title, doc.description, items)
}

#[must_use]
pub fn flatten(doc: &ChapterDocument) -> Vec<Item> {
    let mut items = Vec::with_capacity(doc.sections.len() + doc.term_count());
    for section in &doc.sections {
        items.push(Item::section(section.title.clone()));
        items.extend(section.terms.iter().map(term_item));
    }
    items
}

fn term_item(term: &TermDocument) -> Item {
    let id = term
        .id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .map_or_else(|| ItemId::for_term(&term.title), ItemId::new);

    let visualization = match (&term.viz_path, term.has_viz) {
        (Some(path), true) => Some(Visualization {
            path: path.clone(),
            icon: term.viz_icon.clone(),
            description: None,
        }),
        _ => None,
    };

    let concept = Concept {
        definition: term.definition.clone().unwrap_or_default(),
        keywords: term.keywords.clone().unwrap_or_default(),
        visualization,
        visited: term.visited,
        mastery: term.mastery.map(Mastery::new).unwrap_or_default(),
        last_visited: None,
    };

    Item::concept(id, term.title.clone(), concept)
}
