//! Artifact publishing
//!
//! Persists finished recordings to durable storage and mints share URLs.

pub mod fs;

pub use fs::FsPublisher;

use crate::capture::RawOutput;
use crate::recorder::state::OutputFormat;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// A finished, persisted recording plus its share URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Container format of the stored file
    pub format: OutputFormat,

    /// Size of the stored file in bytes
    pub size_bytes: u64,

    /// Where the file lives in the publisher's backend
    pub location: PathBuf,

    /// Public, resolvable link to the artifact
    pub share_url: String,
}

/// Failure while persisting an artifact.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("artifact of {size_bytes} bytes exceeds the {limit_bytes} byte limit")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("failed to persist artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable storage for finished recordings.
///
/// `publish` must not partially publish: either a fully retrievable artifact
/// with a working URL exists afterwards, or the call fails and no dangling
/// partial object remains.
#[async_trait::async_trait]
pub trait ArtifactPublisher: Send + Sync {
    async fn publish(
        &self,
        output: RawOutput,
        session_id: Uuid,
    ) -> Result<Artifact, PublishError>;
}
