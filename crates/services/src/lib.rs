#![forbid(unsafe_code)]

pub mod app_services;
pub mod authoring;
pub mod content;
pub mod error;
pub mod progress_service;
pub mod reader;

pub use reader_core::Clock;

pub use app_services::AppServices;
pub use content::{ContentSource, FsContentSource, HttpContentSource};
pub use error::{AppServicesError, AuthoringError, ContentSourceError, ProgressError, ReaderError};
pub use progress_service::{LoadedProgress, ProgressService, SavedProgress};
pub use reader::{
    ItemView, ReaderIntent, ReaderService, ReaderSession, ReaderSettings, ReaderSnapshot,
};
