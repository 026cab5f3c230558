//! URL and path validation utilities
//!
//! Provides security-focused validation for configuration and request input:
//! - Public base URL validation (http/https only, must have a host)
//! - Relative path validation (no directory traversal, no absolute paths)

use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Invalid URL format or unsupported scheme
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Path validation failed (traversal attempt, absolute path, etc.)
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Nothing left after dropping `.` components
    #[error("Path '{0}' is empty")]
    EmptyPath(String),
}

/// Validates the public base URL used to build deployment links.
///
/// Only `http` and `https` URLs with a host are accepted. Trailing slashes
/// are removed so that `/apps/...` can be appended directly.
///
/// # Examples
/// ```
/// use sitedrop::core::validation::validate_public_base_url;
///
/// assert_eq!(
///     validate_public_base_url("https://sites.example.com/").unwrap(),
///     "https://sites.example.com"
/// );
/// assert!(validate_public_base_url("ftp://sites.example.com").is_err());
/// assert!(validate_public_base_url("not a url").is_err());
/// ```
pub fn validate_public_base_url(url: &str) -> Result<String, ValidationError> {
    let trimmed = url.trim();
    let parsed = Url::parse(trimmed).map_err(|_| ValidationError::InvalidUrl(url.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::InvalidUrl(format!(
            "{} (invalid scheme: {})",
            url,
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::InvalidUrl(format!("{} (no host)", url)));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Validates a path that must stay inside some root directory.
///
/// Unlike a sanitizer this never rewrites a hostile path into a benign one:
/// parent references, absolute paths and Windows prefixes are rejected.
/// `.` components are dropped.
///
/// # Examples
/// ```
/// use std::path::PathBuf;
/// use sitedrop::core::validation::relative_path;
///
/// assert_eq!(relative_path("site/index.html").unwrap(), PathBuf::from("site/index.html"));
/// assert_eq!(relative_path("./about").unwrap(), PathBuf::from("about"));
/// assert!(relative_path("../etc/passwd").is_err());
/// assert!(relative_path("/etc/passwd").is_err());
/// ```
pub fn relative_path(path: &str) -> Result<PathBuf, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if Path::new(path).is_absolute() {
        return Err(invalid("absolute paths not allowed"));
    }

    let mut safe = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(name) => safe.push(name),
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("parent directory references not allowed")),
            Component::RootDir | Component::Prefix(_) => return Err(invalid("absolute paths not allowed")),
        }
    }

    if safe.as_os_str().is_empty() {
        return Err(ValidationError::EmptyPath(path.to_string()));
    }

    Ok(safe)
}
