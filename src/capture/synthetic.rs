//! Synthetic capture driver
//!
//! Deterministic frame source standing in for a platform capture driver.
//! A producer task ticks at the configured frame rate and records frame
//! timestamps; `end` flushes them into a tagged container. Used by the
//! default binary and the test suite.

use super::traits::{CaptureError, CapturePipeline, PipelineHandle, RawOutput};
use crate::recorder::state::{OutputFormat, RecordingConfig};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Largest virtual capture surface the driver will allocate, per axis.
const MAX_SURFACE: u32 = 16_384;

/// Container magic for synthetic video output.
const VIDEO_MAGIC: &[u8; 4] = b"SYNV";
/// Container magic for synthetic GIF output.
const GIF_MAGIC: &[u8; 4] = b"SYNG";

struct CaptureJob {
    config: RecordingConfig,
    stop_tx: oneshot::Sender<()>,
    producer: JoinHandle<Vec<u64>>,
}

/// In-process capture pipeline producing synthetic frames.
#[derive(Default)]
pub struct SyntheticCapture {
    jobs: Mutex<HashMap<Uuid, CaptureJob>>,
    active: AtomicUsize,
}

impl SyntheticCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of captures currently holding resources. Returns to zero once
    /// every handle has been ended, including on failure paths.
    pub fn active_handles(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn encode(config: &RecordingConfig, frames: &[u64]) -> Vec<u8> {
        let magic = match config.format {
            OutputFormat::Video => VIDEO_MAGIC,
            OutputFormat::Gif => GIF_MAGIC,
        };

        let mut bytes = Vec::with_capacity(32 + frames.len() * 8);
        bytes.extend_from_slice(magic);
        bytes.extend_from_slice(&config.region.x.to_le_bytes());
        bytes.extend_from_slice(&config.region.y.to_le_bytes());
        bytes.extend_from_slice(&config.region.width.to_le_bytes());
        bytes.extend_from_slice(&config.region.height.to_le_bytes());
        bytes.extend_from_slice(&config.fps.as_u32().to_le_bytes());
        bytes.extend_from_slice(&(frames.len() as u64).to_le_bytes());
        for timestamp_ms in frames {
            bytes.extend_from_slice(&timestamp_ms.to_le_bytes());
        }
        bytes
    }
}

#[async_trait::async_trait]
impl CapturePipeline for SyntheticCapture {
    async fn begin(&self, config: &RecordingConfig) -> Result<PipelineHandle, CaptureError> {
        let region = config.region;
        if region.width > MAX_SURFACE || region.height > MAX_SURFACE {
            return Err(CaptureError::Init(format!(
                "region {}x{} exceeds the {}x{} capture surface",
                region.width, region.height, MAX_SURFACE, MAX_SURFACE
            )));
        }

        let frame_interval = Duration::from_secs_f64(1.0 / f64::from(config.fps.as_u32()));
        let (stop_tx, mut stop_rx) = oneshot::channel();

        // Producer stops on the stop signal, or when the job (and its sender)
        // is dropped.
        let producer = tokio::spawn(async move {
            let started = Instant::now();
            let mut frames = Vec::new();
            let mut ticker = tokio::time::interval(frame_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        frames.push(started.elapsed().as_millis() as u64);
                    }
                }
            }
            frames
        });

        let handle = PipelineHandle::new();
        self.jobs.lock().insert(
            handle.id(),
            CaptureJob {
                config: config.clone(),
                stop_tx,
                producer,
            },
        );
        self.active.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(handle = %handle.id(), fps = config.fps.as_u32(), "synthetic capture started");
        Ok(handle)
    }

    async fn end(&self, handle: PipelineHandle) -> Result<RawOutput, CaptureError> {
        let job = self
            .jobs
            .lock()
            .remove(&handle.id())
            .ok_or(CaptureError::UnknownHandle(handle.id()))?;
        // The handle no longer owns resources from here on, even if flushing
        // below fails or this future is dropped mid-await.
        self.active.fetch_sub(1, Ordering::SeqCst);

        let _ = job.stop_tx.send(());
        let frames = job
            .producer
            .await
            .map_err(|e| CaptureError::Encode(format!("frame producer task failed: {e}")))?;

        let bytes = Self::encode(&job.config, &frames);
        tracing::debug!(handle = %handle.id(), frames = frames.len(), "synthetic capture flushed");
        Ok(RawOutput {
            format: job.config.format,
            bytes,
            frame_count: frames.len() as u64,
        })
    }
}
