//! Deployment pipeline: classification, storage, extraction, entry points

pub mod archive;
pub mod classify;
pub mod entry;
pub mod id;
pub mod pipeline;
pub mod store;

pub use archive::{ArchiveError, ExtractStats};
pub use classify::UploadKind;
pub use entry::{EntryPoint, INDEX_FILES, MissingEntry};
pub use id::DeploymentId;
pub use pipeline::{DeployOutcome, Deployer, Deployment, Rejection, Upload};
pub use store::{DeploymentStore, public_url};
