//! Filesystem artifact publisher
//!
//! Writes finished recordings into a local directory and mints share URLs
//! against a configured public base URL. Writes go through a named temp file
//! in the target directory and are persisted with a rename, so a failed
//! publish leaves no partial object behind.

use super::{Artifact, ArtifactPublisher, PublishError};
use crate::capture::RawOutput;
use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

pub struct FsPublisher {
    root: PathBuf,
    base_url: String,
    max_bytes: u64,
}

impl FsPublisher {
    /// Create a publisher rooted at `root`, creating the directory if needed.
    pub fn new(
        root: impl Into<PathBuf>,
        base_url: impl Into<String>,
        max_bytes: u64,
    ) -> Result<Self, PublishError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            base_url: base_url.into(),
            max_bytes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn share_url(&self, file_name: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(file_name)
        )
    }
}

#[async_trait::async_trait]
impl ArtifactPublisher for FsPublisher {
    async fn publish(
        &self,
        output: RawOutput,
        session_id: Uuid,
    ) -> Result<Artifact, PublishError> {
        let size_bytes = output.bytes.len() as u64;
        if size_bytes > self.max_bytes {
            return Err(PublishError::TooLarge {
                size_bytes,
                limit_bytes: self.max_bytes,
            });
        }

        let file_name = format!(
            "recording-{}-{}.{}",
            Utc::now().format("%Y%m%d-%H%M%S"),
            session_id,
            output.format.extension()
        );

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&output.bytes)?;
        tmp.as_file().sync_all()?;

        let location = self.root.join(&file_name);
        tmp.persist(&location).map_err(|e| PublishError::Io(e.error))?;

        let share_url = self.share_url(&file_name);
        tracing::info!(session = %session_id, %share_url, size_bytes, "artifact published");

        Ok(Artifact {
            format: output.format,
            size_bytes,
            location,
            share_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::state::OutputFormat;

    fn output(bytes: Vec<u8>) -> RawOutput {
        RawOutput {
            format: OutputFormat::Video,
            bytes,
            frame_count: 3,
        }
    }

    #[tokio::test]
    async fn publish_writes_file_and_mints_url() {
        let dir = tempfile::tempdir().unwrap();
        let publisher =
            FsPublisher::new(dir.path(), "http://share.test/artifacts/", 1024).unwrap();
        let session_id = Uuid::new_v4();

        let artifact = publisher
            .publish(output(b"recorded bytes".to_vec()), session_id)
            .await
            .unwrap();

        assert_eq!(artifact.size_bytes, 14);
        assert_eq!(
            std::fs::read(&artifact.location).unwrap(),
            b"recorded bytes"
        );
        assert!(artifact.share_url.starts_with("http://share.test/artifacts/"));
        assert!(artifact.share_url.contains(&session_id.to_string()));
        assert!(artifact.share_url.ends_with(".mp4"));
    }

    #[tokio::test]
    async fn share_urls_are_distinct_per_session() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = FsPublisher::new(dir.path(), "http://share.test", 1024).unwrap();

        let a = publisher
            .publish(output(vec![1]), Uuid::new_v4())
            .await
            .unwrap();
        let b = publisher
            .publish(output(vec![2]), Uuid::new_v4())
            .await
            .unwrap();

        assert_ne!(a.share_url, b.share_url);
    }

    #[tokio::test]
    async fn oversized_output_rejected_without_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = FsPublisher::new(dir.path(), "http://share.test", 8).unwrap();

        let result = publisher
            .publish(output(vec![0u8; 64]), Uuid::new_v4())
            .await;

        assert!(matches!(
            result,
            Err(PublishError::TooLarge {
                size_bytes: 64,
                limit_bytes: 8
            })
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
