//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use reader_core::ContentError;
use reader_core::model::ChapterId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by content sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentSourceError {
    #[error("no content found for chapter {0}")]
    NotFound(ChapterId),
    #[error("content request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid content url: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while opening or driving a reader session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReaderError {
    #[error(transparent)]
    Source(#[from] ContentSourceError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted by the authoring tools.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthoringError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("invalid json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Source(#[from] ContentSourceError),
}
