//! Recording state management
//!
//! Defines the capture configuration model and the session state machine types.

use crate::publish::Artifact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Rectangular screen region to capture.
///
/// Coordinates are in physical pixels with the origin at the top-left of the
/// virtual screen. The region is immutable once a session has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Output container format for a finished recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Video,
    Gif,
}

impl OutputFormat {
    /// File extension used for published artifacts.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Gif => "gif",
        }
    }
}

/// Supported capture frame rates.
///
/// Backed by the raw fps value on the wire; anything outside {30, 60, 120}
/// is rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FrameRate {
    Fps30,
    Fps60,
    Fps120,
}

impl FrameRate {
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Fps30 => 30,
            Self::Fps60 => 60,
            Self::Fps120 => 120,
        }
    }
}

impl TryFrom<u32> for FrameRate {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            30 => Ok(Self::Fps30),
            60 => Ok(Self::Fps60),
            120 => Ok(Self::Fps120),
            other => Err(ConfigError::UnsupportedFrameRate(other)),
        }
    }
}

impl From<FrameRate> for u32 {
    fn from(value: FrameRate) -> Self {
        value.as_u32()
    }
}

/// Encoding quality preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    High,
    Medium,
    Low,
}

/// Configuration for starting a recording.
///
/// Constructed once per start request and never mutated after acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Screen region to capture
    pub region: CaptureRegion,

    /// Output format of the finished artifact
    pub format: OutputFormat,

    /// Capture frame rate
    pub fps: FrameRate,

    /// Encoding quality preset
    pub quality: Quality,
}

impl RecordingConfig {
    /// Validate the configuration.
    ///
    /// Pure check with no side effects; a rejected config never reaches the
    /// capture pipeline.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.width == 0 || self.region.height == 0 {
            return Err(ConfigError::EmptyRegion {
                width: self.region.width,
                height: self.region.height,
            });
        }
        Ok(())
    }
}

/// Validation failure for a recording configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("capture region must have positive dimensions, got {width}x{height}")]
    EmptyRegion { width: u32, height: u32 },

    #[error("unsupported frame rate {0}, expected 30, 60 or 120")]
    UnsupportedFrameRate(u32),
}

/// Current state of a recording session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No session occupies the slot
    Idle,
    /// Start accepted, waiting for the capture pipeline to acknowledge
    Starting,
    /// Capture pipeline is producing frames
    Active,
    /// Stop accepted, pipeline is flushing and the artifact is being published
    Stopping,
    /// Artifact published, session finished
    Completed,
    /// Capture or publishing failed
    Failed,
}

impl SessionState {
    /// Terminal states may be replaced by a fresh session.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

/// One recording attempt from start to terminal outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque session identity
    pub id: Uuid,

    /// Accepted configuration for this session
    pub config: RecordingConfig,

    /// Current lifecycle state
    pub status: SessionState,

    /// When the start request was accepted
    pub started_at: DateTime<Utc>,

    /// When the session reached a terminal state
    pub stopped_at: Option<DateTime<Utc>>,

    /// Published artifact, present only once Completed
    pub artifact: Option<Artifact>,

    /// Failure detail, present only if Failed
    pub error: Option<String>,
}

impl Session {
    /// Create a new session in the Starting state.
    pub fn new(config: RecordingConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            status: SessionState::Starting,
            started_at: Utc::now(),
            stopped_at: None,
            artifact: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: u32, height: u32) -> RecordingConfig {
        RecordingConfig {
            region: CaptureRegion::new(0, 0, width, height),
            format: OutputFormat::Video,
            fps: FrameRate::Fps30,
            quality: Quality::High,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config(800, 600).validate().is_ok());
    }

    #[test]
    fn zero_width_rejected() {
        assert_eq!(
            config(0, 600).validate(),
            Err(ConfigError::EmptyRegion {
                width: 0,
                height: 600
            })
        );
    }

    #[test]
    fn zero_height_rejected() {
        assert!(config(800, 0).validate().is_err());
    }

    #[test]
    fn frame_rate_accepts_supported_values() {
        assert_eq!(FrameRate::try_from(30), Ok(FrameRate::Fps30));
        assert_eq!(FrameRate::try_from(120), Ok(FrameRate::Fps120));
        assert_eq!(
            FrameRate::try_from(45),
            Err(ConfigError::UnsupportedFrameRate(45))
        );
    }

    #[test]
    fn config_parses_from_wire_json() {
        let parsed: RecordingConfig = serde_json::from_str(
            r#"{"region":{"x":0,"y":0,"width":800,"height":600},"format":"video","fps":30,"quality":"high"}"#,
        )
        .unwrap();
        assert_eq!(parsed, config(800, 600));
    }

    #[test]
    fn out_of_enum_fps_fails_to_parse() {
        let result: Result<RecordingConfig, _> = serde_json::from_str(
            r#"{"region":{"x":0,"y":0,"width":800,"height":600},"format":"video","fps":45,"quality":"high"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn negative_region_coordinate_fails_to_parse() {
        let result: Result<CaptureRegion, _> =
            serde_json::from_str(r#"{"x":-1,"y":0,"width":800,"height":600}"#);
        assert!(result.is_err());
    }

    #[test]
    fn new_session_starts_in_starting_state() {
        let session = Session::new(config(800, 600));
        assert_eq!(session.status, SessionState::Starting);
        assert!(session.artifact.is_none());
        assert!(session.error.is_none());
    }
}
