//! Upload-to-deployment pipeline
//!
//! Turns the bytes of one upload into a servable directory and a public URL.
//! The result distinguishes three cases so the caller decides how to notify:
//! deployed, rejected (the user sent something unusable) and aborted (the
//! service failed).

use std::path::PathBuf;

use fs_err::tokio as fs;

use crate::core::config::Config;
use crate::core::error::{AppError, AppResult};
use crate::deploy::archive::{ArchiveError, extract_archive};
use crate::deploy::classify::UploadKind;
use crate::deploy::entry::{EntryPoint, MissingEntry, resolve_entry_point};
use crate::deploy::id::DeploymentId;
use crate::deploy::store::{DeploymentStore, public_url};

/// Name a single uploaded HTML document is stored under
pub const HTML_INDEX_NAME: &str = "index.html";

/// One uploaded file
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A successful deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub id: DeploymentId,
    pub dir: PathBuf,
    pub entry: EntryPoint,
    pub url: String,
}

/// Upload refused because of its content
#[derive(Debug)]
pub enum Rejection {
    /// Neither a zip nor an HTML file
    UnsupportedType,
    /// Corrupt, unsafe or oversized archive
    InvalidArchive(ArchiveError),
    /// Archive extracted fine but has no usable index file
    MissingEntryPoint(MissingEntry),
}

/// Outcome of one pipeline run
#[derive(Debug)]
pub enum DeployOutcome {
    Deployed(Deployment),
    Rejected(Rejection),
    Aborted(AppError),
}

/// Runs the deployment pipeline against a [`DeploymentStore`]
#[derive(Debug, Clone)]
pub struct Deployer {
    store: DeploymentStore,
    public_base_url: String,
    max_extract_bytes: u64,
}

impl Deployer {
    pub fn new(store: DeploymentStore, public_base_url: impl Into<String>, max_extract_bytes: u64) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into(),
            max_extract_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            DeploymentStore::new(&config.deploy_root),
            config.public_base_url.clone(),
            config.max_extract_bytes,
        )
    }

    pub fn store(&self) -> &DeploymentStore {
        &self.store
    }

    /// Deploys one upload.
    ///
    /// Unsupported uploads never create a directory. Once the directory
    /// exists it is kept whatever happens next.
    pub async fn deploy(&self, upload: Upload) -> DeployOutcome {
        match self.try_deploy(upload).await {
            Ok(outcome) => outcome,
            Err(e) => DeployOutcome::Aborted(e),
        }
    }

    async fn try_deploy(&self, upload: Upload) -> AppResult<DeployOutcome> {
        let kind = UploadKind::classify(&upload.file_name, upload.mime_type.as_deref());
        tracing::info!(
            "Deploying '{}' ({} bytes, mime {:?}) as {:?}",
            upload.file_name,
            upload.bytes.len(),
            upload.mime_type,
            kind
        );

        if kind == UploadKind::Unsupported {
            return Ok(DeployOutcome::Rejected(Rejection::UnsupportedType));
        }

        let (id, dir) = self.store.create().await?;

        let entry = match kind {
            UploadKind::Zip => match self.deploy_archive(&id, &dir, upload.bytes).await? {
                Ok(entry) => entry,
                Err(rejection) => {
                    tracing::warn!("Deployment {} rejected: {:?}", id, rejection);
                    return Ok(DeployOutcome::Rejected(rejection));
                }
            },
            UploadKind::Html => {
                fs::write(dir.join(HTML_INDEX_NAME), &upload.bytes).await?;
                EntryPoint::Root
            }
            UploadKind::Unsupported => return Ok(DeployOutcome::Rejected(Rejection::UnsupportedType)),
        };

        let url = public_url(&self.public_base_url, &id, &entry);
        tracing::info!("Deployment {} ready at {}", id, url);

        Ok(DeployOutcome::Deployed(Deployment { id, dir, entry, url }))
    }

    /// Stages, extracts and inspects an archive for deployment `id`
    async fn deploy_archive(
        &self,
        id: &DeploymentId,
        dir: &std::path::Path,
        bytes: Vec<u8>,
    ) -> AppResult<Result<EntryPoint, Rejection>> {
        let archive_path = self.store.staging_archive(id);
        fs::write(&archive_path, bytes).await?;

        let extraction = {
            let archive_path = archive_path.clone();
            let dest = dir.to_path_buf();
            let max_bytes = self.max_extract_bytes;
            tokio::task::spawn_blocking(move || extract_archive(&archive_path, &dest, max_bytes)).await?
        };

        if let Err(e) = fs::remove_file(&archive_path).await {
            tracing::warn!("Failed to remove temporary archive: {}", e);
        }

        match extraction {
            Ok(stats) => tracing::debug!("Extracted {:?} into {}", stats, dir.display()),
            Err(e) => return Ok(Err(Rejection::InvalidArchive(e))),
        }

        Ok(resolve_entry_point(dir).await?.map_err(Rejection::MissingEntryPoint))
    }
}
