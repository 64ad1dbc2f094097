//! Capture pipeline contract
//!
//! Platform-agnostic interface between the session coordinator and whatever
//! turns a screen region over time into encoded bytes.

use crate::recorder::state::{OutputFormat, RecordingConfig};
use thiserror::Error;
use uuid::Uuid;

/// Failure inside the capture pipeline.
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("failed to initialize capture: {0}")]
    Init(String),

    #[error("encoder error: {0}")]
    Encode(String),

    #[error("unknown pipeline handle {0}")]
    UnknownHandle(Uuid),
}

/// Opaque token for a running capture.
///
/// Minted by [`CapturePipeline::begin`] and consumed exactly once by
/// [`CapturePipeline::end`].
#[derive(Debug)]
pub struct PipelineHandle {
    id: Uuid,
}

impl PipelineHandle {
    pub(crate) fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// Encoded output produced by a finished capture.
#[derive(Debug, Clone)]
pub struct RawOutput {
    /// Container format of `bytes`
    pub format: OutputFormat,

    /// Encoded recording bytes
    pub bytes: Vec<u8>,

    /// Number of frames captured
    pub frame_count: u64,
}

/// A capture-and-encode capability.
///
/// The coordinator guarantees `begin` and `end` are never in flight
/// concurrently for the same handle. Implementations own real system
/// resources for the duration of a capture and must release them on every
/// exit path: `end` success, `end` failure, a partway-failed `begin`, and a
/// `begin`/`end` future dropped before completion (deadline cancellation).
#[async_trait::async_trait]
pub trait CapturePipeline: Send + Sync {
    /// Allocate capture resources for the configured region and frame rate
    /// and start producing frames into an internal buffer.
    async fn begin(&self, config: &RecordingConfig) -> Result<PipelineHandle, CaptureError>;

    /// Stop accepting frames, flush the encoder and materialize the finished
    /// output matching `config.format`.
    async fn end(&self, handle: PipelineHandle) -> Result<RawOutput, CaptureError>;
}
