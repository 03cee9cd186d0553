//! Offline tools that produce chapter documents.

use std::path::{Path, PathBuf};

use reader_core::model::{ChapterDocument, VisualizationCatalog};
use reader_core::parser::planning::{PlanningMeta, parse_planning};
use reader_core::parser::split::{ChapterSplit, split_document};
use tracing::info;

use crate::error::AuthoringError;

async fn read(path: &Path) -> Result<String, AuthoringError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AuthoringError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn write(path: &Path, contents: String) -> Result<(), AuthoringError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| AuthoringError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn json_error(path: &Path) -> impl FnOnce(serde_json::Error) -> AuthoringError + '_ {
    move |source| AuthoringError::Json {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads a title -> visualization catalog from a JSON file.
///
/// # Errors
///
/// Returns `AuthoringError` if the file cannot be read or is not a catalog.
pub async fn load_catalog(path: &Path) -> Result<VisualizationCatalog, AuthoringError> {
    let text = read(path).await?;
    VisualizationCatalog::from_json(&text).map_err(json_error(path))
}

/// Converts a planning document into a structured chapter file.
///
/// # Errors
///
/// Returns `AuthoringError` if the input cannot be read or the output written.
pub async fn convert(
    input: &Path,
    output: &Path,
    meta: &PlanningMeta,
    catalog: &VisualizationCatalog,
) -> Result<ChapterDocument, AuthoringError> {
    let text = read(input).await?;
    let document = parse_planning(&text, meta, catalog);
    let json = document.to_json_pretty().map_err(json_error(output))?;
    write(output, json).await?;

    info!(
        input = %input.display(),
        output = %output.display(),
        sections = document.sections.len(),
        terms = document.term_count(),
        "converted planning document"
    );
    Ok(document)
}

/// Splits a structured document into `chapter{n}.json` files under `out_dir`.
///
/// Returns the written paths in plan order.
///
/// # Errors
///
/// Returns `AuthoringError` if a file cannot be read or written, a JSON input
/// is malformed, or the plan names a missing section.
pub async fn split(
    input: &Path,
    plan_path: &Path,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, AuthoringError> {
    let source = ChapterDocument::from_json(&read(input).await?).map_err(json_error(input))?;
    let plan: Vec<ChapterSplit> =
        serde_json::from_str(&read(plan_path).await?).map_err(json_error(plan_path))?;
    let chapters = split_document(&source, &plan)?;

    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| AuthoringError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;

    let mut written = Vec::with_capacity(chapters.len());
    for (entry, document) in plan.iter().zip(&chapters) {
        let path = out_dir.join(format!("chapter{}.json", entry.chapter));
        let json = document.to_json_pretty().map_err(json_error(&path))?;
        write(&path, json).await?;
        info!(
            path = %path.display(),
            sections = document.sections.len(),
            terms = document.term_count(),
            "wrote chapter"
        );
        written.push(path);
    }
    Ok(written)
}
