//! Deployment directory layout: `<root>/<deploymentId>/...`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs_err::tokio as fs;

use crate::core::error::AppResult;
use crate::deploy::entry::EntryPoint;
use crate::deploy::id::DeploymentId;

/// Fresh identifiers drawn before giving up on directory creation
const MAX_CREATE_ATTEMPTS: usize = 4;

/// Owns the storage root under which every deployment gets a directory
#[derive(Debug, Clone)]
pub struct DeploymentStore {
    root: PathBuf,
}

impl DeploymentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the storage root if it does not exist yet
    pub async fn ensure_root(&self) -> AppResult<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Directory of a deployment
    pub fn dir(&self, id: &DeploymentId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Where an uploaded archive waits while it is extracted into [`dir`].
    ///
    /// A hidden sibling of the deployment directory, so no archive member
    /// can collide with it.
    ///
    /// [`dir`]: DeploymentStore::dir
    pub fn staging_archive(&self, id: &DeploymentId) -> PathBuf {
        self.root.join(format!(".{}.upload.zip", id))
    }

    /// Allocates a new deployment directory.
    ///
    /// The leaf directory is created non-recursively, so an identifier that
    /// already exists on disk is detected and replaced by a fresh one rather
    /// than shared between two uploads.
    pub async fn create(&self) -> AppResult<(DeploymentId, PathBuf)> {
        self.ensure_root().await?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let id = DeploymentId::generate();
            let dir = self.dir(&id);
            match fs::create_dir(&dir).await {
                Ok(()) => return Ok((id, dir)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < MAX_CREATE_ATTEMPTS => {
                    tracing::warn!("Deployment id {} already taken, drawing another", id);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Builds the public URL of a deployment.
///
/// `base` must not end with a slash. The nested directory name is
/// percent-encoded as a single path segment.
///
/// # Examples
/// ```
/// use sitedrop::deploy::{DeploymentId, EntryPoint, public_url};
///
/// let id = DeploymentId::parse("AbCdEf1234").unwrap();
/// assert_eq!(
///     public_url("https://example.com", &id, &EntryPoint::Root),
///     "https://example.com/apps/AbCdEf1234/"
/// );
/// assert_eq!(
///     public_url("https://example.com", &id, &EntryPoint::Nested("my site".into())),
///     "https://example.com/apps/AbCdEf1234/my%20site/"
/// );
/// ```
pub fn public_url(base: &str, id: &DeploymentId, entry: &EntryPoint) -> String {
    let mut url = format!("{}/apps/{}/", base, id);
    if let EntryPoint::Nested(dir) = entry {
        url.push_str(&urlencoding::encode(dir));
        url.push('/');
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_create_allocates_directory() {
        let tmp = tempdir().unwrap();
        let store = DeploymentStore::new(tmp.path().join("deployments"));

        let (id, dir) = store.create().await.unwrap();

        assert!(dir.is_dir());
        assert_eq!(dir, store.dir(&id));
        assert_eq!(dir.parent().unwrap(), store.root());
    }

    #[tokio::test]
    async fn test_create_distinct_directories() {
        let tmp = tempdir().unwrap();
        let store = DeploymentStore::new(tmp.path());

        let (a, _) = store.create().await.unwrap();
        let (b, _) = store.create().await.unwrap();

        assert_ne!(a, b);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_staging_archive_is_outside_deployment() {
        let store = DeploymentStore::new("/srv/sites");
        let id = DeploymentId::parse("abcdefghij").unwrap();

        let staging = store.staging_archive(&id);

        assert_eq!(staging, PathBuf::from("/srv/sites/.abcdefghij.upload.zip"));
        assert!(!staging.starts_with(store.dir(&id)));
    }

    #[test]
    fn test_public_url_nested() {
        let id = DeploymentId::parse("abcdefghij").unwrap();
        assert_eq!(
            public_url("http://localhost:3000", &id, &EntryPoint::Nested("foo".to_string())),
            "http://localhost:3000/apps/abcdefghij/foo/"
        );
    }
}
