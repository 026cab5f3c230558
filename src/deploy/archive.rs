//! Safe zip extraction
//!
//! Every entry is written below the destination directory or the whole
//! extraction fails. Blocking; run it on `spawn_blocking` from async code.

use std::io::{self, BufReader, Read};
use std::path::{Component, Path};

use thiserror::Error;
use zip::ZipArchive;

/// Directory macOS Finder adds to archives for resource forks
const MACOS_METADATA_DIR: &str = "__MACOSX";

/// Extraction failures. All of them mean "not a usable zip" to the user.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Not a zip container, or a corrupt one
    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error during extraction: {0}")]
    Io(#[from] io::Error),

    /// Entry whose name would land outside the destination
    #[error("archive entry escapes the extraction directory: {0}")]
    UnsafeEntry(String),

    /// Uncompressed content exceeds the configured cap
    #[error("archive expands beyond {limit} bytes")]
    TooLarge { limit: u64 },
}

/// Summary of a successful extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub files: usize,
    pub directories: usize,
    pub skipped: usize,
    pub bytes: u64,
}

/// Extracts `archive_path` into `dest`.
///
/// # Arguments
/// * `archive_path` - Zip file on disk
/// * `dest` - Existing destination directory
/// * `max_bytes` - Cap on the total uncompressed size written
///
/// # Errors
/// Fails on corrupt containers, entries with absolute or `..` names, and
/// archives that expand beyond `max_bytes`. Files written before the failure
/// are left in place.
pub fn extract_archive(archive_path: &Path, dest: &Path, max_bytes: u64) -> Result<ExtractStats, ArchiveError> {
    let file = fs_err::File::open(archive_path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let mut stats = ExtractStats::default();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| ArchiveError::UnsafeEntry(entry.name().to_string()))?;

        if is_macos_metadata(&relative) {
            stats.skipped += 1;
            continue;
        }

        let target = dest.join(&relative);
        if entry.is_dir() {
            fs_err::create_dir_all(&target)?;
            stats.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs_err::create_dir_all(parent)?;
        }

        // Declared sizes can lie; count what actually gets inflated.
        let remaining = max_bytes.saturating_sub(stats.bytes);
        let mut out = fs_err::File::create(&target)?;
        let written = io::copy(&mut entry.by_ref().take(remaining.saturating_add(1)), &mut out)?;
        stats.bytes += written;
        if stats.bytes > max_bytes {
            return Err(ArchiveError::TooLarge { limit: max_bytes });
        }
        stats.files += 1;
    }

    Ok(stats)
}

fn is_macos_metadata(path: &Path) -> bool {
    matches!(path.components().next(), Some(Component::Normal(first)) if first == MACOS_METADATA_DIR)
}
