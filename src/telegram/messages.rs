//! User-facing reply texts

use indoc::indoc;

use crate::deploy::{Deployment, MissingEntry, Rejection};

/// Reply to `/start` and `/help`
pub const HELP: &str = indoc! {"
    Hi! Send me your site and I will deploy it as a static website.
    Send a zip archive (with index.html at its root or inside its only folder), or a single HTML file.
    Once the deployment is done I will reply with the link."};

/// Reply to messages without an attachment
pub const SEND_FILE_PROMPT: &str = "Please send a zip archive (containing index.html) or a single HTML file.";

pub const UNSUPPORTED_TYPE: &str =
    "Only zip archives (containing index.html) or single HTML files are supported. Please check the file type and try again.";

pub const INVALID_ARCHIVE: &str = "Failed to extract the archive. Please make sure you uploaded a valid zip file.";

pub const NO_INDEX_IN_DIRECTORY: &str = "No index.html found after extracting the zip. Make sure index.html is at the root or inside the only top-level folder.";

pub const NO_INDEX_AT_ROOT: &str =
    "index.html was not found at the root of the zip. Put index.html at the root or inside a single top-level folder.";

/// Reply for a refused upload
pub fn rejection(rejection: &Rejection) -> &'static str {
    match rejection {
        Rejection::UnsupportedType => UNSUPPORTED_TYPE,
        Rejection::InvalidArchive(_) => INVALID_ARCHIVE,
        Rejection::MissingEntryPoint(MissingEntry::NoIndexInDirectory(_)) => NO_INDEX_IN_DIRECTORY,
        Rejection::MissingEntryPoint(MissingEntry::NoIndexAtRoot { .. }) => NO_INDEX_AT_ROOT,
    }
}

/// Reply for a successful deployment
pub fn deployed(deployment: &Deployment) -> String {
    format!("Deployed successfully:\n{}", deployment.url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::{ArchiveError, DeploymentId, EntryPoint};
    use std::path::PathBuf;

    #[test]
    fn test_missing_entry_replies_name_index() {
        let cases = vec![
            Rejection::MissingEntryPoint(MissingEntry::NoIndexInDirectory("dist".into())),
            Rejection::MissingEntryPoint(MissingEntry::NoIndexAtRoot { directories: 2 }),
        ];

        for case in cases {
            assert!(rejection(&case).contains("index.html"), "Failed for: {:?}", case);
        }
    }

    #[test]
    fn test_rejection_texts_are_distinct() {
        let invalid = Rejection::InvalidArchive(ArchiveError::UnsafeEntry("../x".into()));
        assert_eq!(rejection(&invalid), INVALID_ARCHIVE);
        assert_eq!(rejection(&Rejection::UnsupportedType), UNSUPPORTED_TYPE);
        assert_ne!(INVALID_ARCHIVE, UNSUPPORTED_TYPE);
    }

    #[test]
    fn test_deployed_contains_url() {
        let deployment = Deployment {
            id: DeploymentId::parse("abcdefghij").unwrap(),
            dir: PathBuf::from("deployments/abcdefghij"),
            entry: EntryPoint::Root,
            url: "https://example.com/apps/abcdefghij/".to_string(),
        };

        assert!(deployed(&deployment).ends_with("\nhttps://example.com/apps/abcdefghij/"));
    }

    #[test]
    fn test_help_mentions_both_formats() {
        assert!(HELP.contains("zip"));
        assert!(HELP.contains("HTML"));
        assert!(HELP.lines().count() >= 3);
    }
}
