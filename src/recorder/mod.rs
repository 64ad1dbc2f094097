//! Recording system module
//!
//! This module implements the session lifecycle:
//! - Session and configuration model with validation
//! - RecordingCoordinator owning the single session slot

pub mod coordinator;
pub mod state;

pub use coordinator::{RecordingCoordinator, RecordingEvent};
pub use state::{RecordingConfig, Session, SessionState};
