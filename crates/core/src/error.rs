use thiserror::Error;

/// Errors raised while turning raw chapter content into items.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("invalid chapter document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate item id `{0}` in chapter")]
    DuplicateItemId(String),

    #[error("section index {index} is out of range ({available} sections)")]
    SectionOutOfRange { index: usize, available: usize },
}
