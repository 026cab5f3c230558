//! Entry point resolution for an extracted archive

use std::path::Path;

use fs_err::tokio as fs;

use crate::core::error::AppResult;

/// File names a directory request resolves to, in order of preference
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Where the public URL of a deployment points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// The deployment root holds the index file
    Root,
    /// The single top-level directory holds the index file
    Nested(String),
}

/// Why no entry point was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingEntry {
    /// Exactly one top-level directory, without an index file inside
    NoIndexInDirectory(String),
    /// No root index file and zero or several top-level directories
    NoIndexAtRoot { directories: usize },
}

/// Returns true if `dir` directly contains `index.html` or `index.htm`
pub async fn has_index(dir: &Path) -> bool {
    for name in INDEX_FILES {
        if let Ok(meta) = fs::metadata(dir.join(name)).await {
            if meta.is_file() {
                return true;
            }
        }
    }
    false
}

/// Names of the directories immediately under `dir`, sorted
pub async fn top_level_directories(dir: &Path) -> AppResult<Vec<String>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut dirs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            dirs.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Resolves the entry point of an extracted deployment.
///
/// 1. An index file at the root wins.
/// 2. Otherwise, if there is exactly one top-level directory and it holds an
///    index file, the URL points into it. Files are never moved.
/// 3. Anything else has no entry point. Loose files at the root do not count
///    as directories.
pub async fn resolve_entry_point(dir: &Path) -> AppResult<Result<EntryPoint, MissingEntry>> {
    if has_index(dir).await {
        return Ok(Ok(EntryPoint::Root));
    }

    let dirs = top_level_directories(dir).await?;
    match dirs.as_slice() {
        [only] => {
            if has_index(&dir.join(only)).await {
                Ok(Ok(EntryPoint::Nested(only.clone())))
            } else {
                Ok(Err(MissingEntry::NoIndexInDirectory(only.clone())))
            }
        }
        _ => Ok(Err(MissingEntry::NoIndexAtRoot {
            directories: dirs.len(),
        })),
    }
}
