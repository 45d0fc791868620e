//! Content loader - reads post documents from the posts directory

use std::io;
use std::path::{Path, PathBuf};
use tokio::task::{JoinError, JoinSet};
use walkdir::WalkDir;

use crate::error::{PostError, Result};

/// A raw source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name minus extension, e.g. `2021-05-18.testing`
    pub name: String,
    /// Full file contents
    pub raw: String,
}

impl Document {
    pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
        }
    }
}

/// List the markdown files directly inside `dir`, sorted by file name
pub fn document_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PostError::Io {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "posts directory not found"),
        });
    }

    let mut paths = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| PostError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        let path = entry.path();
        if path.is_file() && is_markdown_file(path) {
            paths.push(path.to_path_buf());
        } else {
            tracing::debug!("Skipping {:?}", path);
        }
    }

    Ok(paths)
}

/// Read every post document in `dir`.
///
/// Files are read concurrently; the result is in file-name order regardless
/// of which read finishes first.
pub async fn load_documents(dir: &Path) -> Result<Vec<Document>> {
    let paths = document_paths(dir)?;

    let mut reads = JoinSet::new();
    for (index, path) in paths.into_iter().enumerate() {
        reads.spawn(async move {
            let raw = tokio::fs::read_to_string(&path).await;
            (index, path, raw)
        });
    }

    let mut slots: Vec<Option<Document>> = vec![None; reads.len()];
    while let Some(joined) = reads.join_next().await {
        let (index, path, raw) = match joined {
            Ok(read) => read,
            Err(e) => return Err(read_task_failed(dir, e)),
        };
        let raw = raw.map_err(|source| PostError::Io {
            path: path.clone(),
            source,
        })?;
        slots[index] = Some(Document::new(identifying_name(&path), raw));
    }

    let documents: Vec<Document> = slots.into_iter().flatten().collect();
    tracing::debug!("Read {} documents from {:?}", documents.len(), dir);
    Ok(documents)
}

/// A read task that panicked re-raises the panic; a cancelled one is an I/O
/// failure on the directory
fn read_task_failed(dir: &Path, e: JoinError) -> PostError {
    match e.try_into_panic() {
        Ok(panic) => std::panic::resume_unwind(panic),
        Err(e) => PostError::Io {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Interrupted, e),
        },
    }
}

/// File name without its extension
pub fn identifying_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
