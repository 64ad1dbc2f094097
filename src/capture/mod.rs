//! Capture pipeline implementations
//!
//! The coordinator only sees the [`CapturePipeline`] trait; drivers for real
//! platform capture plug in behind it.

pub mod synthetic;
pub mod traits;

pub use synthetic::SyntheticCapture;
pub use traits::{CaptureError, CapturePipeline, PipelineHandle, RawOutput};
