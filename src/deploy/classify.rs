//! Upload classification by file name and declared media type

/// Deployment strategy for an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Zip archive, extracted into the deployment directory
    Zip,
    /// Single HTML document, stored as `index.html`
    Html,
    Unsupported,
}

impl UploadKind {
    /// Classifies an upload.
    ///
    /// A file is a zip if its name ends with `.zip` or its media type
    /// mentions `zip`; it is HTML if its name ends with `.html`/`.htm` or its
    /// media type is `text/html`. Zip wins when both match. Name matching is
    /// case-insensitive.
    pub fn classify(file_name: &str, mime_type: Option<&str>) -> Self {
        let name = file_name.to_ascii_lowercase();
        let mime = mime_type.unwrap_or_default().to_ascii_lowercase();

        if name.ends_with(".zip") || mime.contains("zip") {
            UploadKind::Zip
        } else if name.ends_with(".html") || name.ends_with(".htm") || mime.contains("text/html") {
            UploadKind::Html
        } else {
            UploadKind::Unsupported
        }
    }
}
