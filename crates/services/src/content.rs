//! Where chapter content comes from.
//!
//! Both sources share one layout: `data/chapter{n}.json` is preferred, and
//! `chapters/chapter{n}.md` is used when no structured document exists.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use reader_core::model::ChapterId;
use reader_core::parser::RawContent;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::error::ContentSourceError;

const STRUCTURED_DIR: &str = "data";
const MARKDOWN_DIR: &str = "chapters";

fn structured_name(chapter: ChapterId) -> String {
    format!("chapter{}.json", chapter.value())
}

fn markdown_name(chapter: ChapterId) -> String {
    format!("chapter{}.md", chapter.value())
}

/// Parses `chapter{n}.json` / `chapter{n}.md` file names.
fn chapter_from_file_name(name: &str) -> Option<ChapterId> {
    let stem = name
        .strip_suffix(".json")
        .or_else(|| name.strip_suffix(".md"))?;
    stem.strip_prefix("chapter")?.parse().ok()
}

/// Fetches raw chapter content by chapter number.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the raw content for a chapter.
    ///
    /// # Errors
    ///
    /// Returns `ContentSourceError::NotFound` when neither format exists, or the
    /// underlying IO/HTTP error.
    async fn fetch(&self, chapter: ChapterId) -> Result<RawContent, ContentSourceError>;

    /// Chapters this source can serve, ascending. Sources that cannot enumerate
    /// return an empty list.
    ///
    /// # Errors
    ///
    /// Returns `ContentSourceError` if enumeration fails.
    async fn list_chapters(&self) -> Result<Vec<ChapterId>, ContentSourceError> {
        Ok(Vec::new())
    }
}

/// Picks a source for a location: `http(s)://` URLs are fetched over HTTP,
/// anything else is treated as a directory.
///
/// # Errors
///
/// Returns `ContentSourceError::Url` if an HTTP location does not parse.
pub fn source_for(location: &str) -> Result<Arc<dyn ContentSource>, ContentSourceError> {
    let trimmed = location.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(Arc::new(HttpContentSource::new(trimmed)?))
    } else {
        Ok(Arc::new(FsContentSource::new(trimmed)))
    }
}

//
// ─── FILESYSTEM ────────────────────────────────────────────────────────────────
//

/// Reads chapters from a local content root.
#[derive(Debug, Clone)]
pub struct FsContentSource {
    root: PathBuf,
}

impl FsContentSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_optional(path: &Path) -> Result<Option<String>, ContentSourceError> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ContentSourceError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    async fn scan(dir: &Path, found: &mut Vec<ChapterId>) -> Result<(), ContentSourceError> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(ContentSourceError::Io {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        };

        let io = |source| ContentSourceError::Io {
            path: dir.to_path_buf(),
            source,
        };
        while let Some(entry) = entries.next_entry().await.map_err(io)? {
            if let Some(chapter) = entry.file_name().to_str().and_then(chapter_from_file_name) {
                found.push(chapter);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ContentSource for FsContentSource {
    async fn fetch(&self, chapter: ChapterId) -> Result<RawContent, ContentSourceError> {
        let json_path = self.root.join(STRUCTURED_DIR).join(structured_name(chapter));
        if let Some(text) = Self::read_optional(&json_path).await? {
            debug!(path = %json_path.display(), "loaded structured chapter");
            return Ok(RawContent::Structured(text));
        }

        let md_path = self.root.join(MARKDOWN_DIR).join(markdown_name(chapter));
        if let Some(text) = Self::read_optional(&md_path).await? {
            debug!(path = %md_path.display(), "loaded markdown chapter");
            return Ok(RawContent::Markdown(text));
        }

        Err(ContentSourceError::NotFound(chapter))
    }

    async fn list_chapters(&self) -> Result<Vec<ChapterId>, ContentSourceError> {
        let mut found = Vec::new();
        Self::scan(&self.root.join(STRUCTURED_DIR), &mut found).await?;
        Self::scan(&self.root.join(MARKDOWN_DIR), &mut found).await?;
        found.sort_unstable();
        found.dedup();
        Ok(found)
    }
}

//
// ─── HTTP ──────────────────────────────────────────────────────────────────────
//

/// Fetches chapters relative to a base URL.
#[derive(Clone)]
pub struct HttpContentSource {
    client: Client,
    base: Url,
}

impl HttpContentSource {
    /// # Errors
    ///
    /// Returns `ContentSourceError::Url` if `base` is not a valid URL.
    pub fn new(base: &str) -> Result<Self, ContentSourceError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, dir: &str, file: &str) -> Result<Url, ContentSourceError> {
        Ok(self.base.join(&format!("{dir}/{file}"))?)
    }

    async fn get_optional(&self, url: Url) -> Result<Option<String>, ContentSourceError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ContentSourceError::HttpStatus(status));
        }
        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch(&self, chapter: ChapterId) -> Result<RawContent, ContentSourceError> {
        let json_url = self.url_for(STRUCTURED_DIR, &structured_name(chapter))?;
        if let Some(text) = self.get_optional(json_url).await? {
            return Ok(RawContent::Structured(text));
        }

        let md_url = self.url_for(MARKDOWN_DIR, &markdown_name(chapter))?;
        if let Some(text) = self.get_optional(md_url).await? {
            return Ok(RawContent::Markdown(text));
        }

        Err(ContentSourceError::NotFound(chapter))
    }
}
