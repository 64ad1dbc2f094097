//! Recording coordinator
//!
//! Owns the single session slot and drives the capture pipeline and artifact
//! publisher through the session lifecycle.

use super::state::{RecordingConfig, Session, SessionState};
use crate::capture::{CapturePipeline, PipelineHandle};
use crate::publish::ArtifactPublisher;
use crate::utils::error::{RecorderError, RecorderResult};
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted during recording
#[derive(Debug, Clone)]
pub enum RecordingEvent {
    /// Capture pipeline acknowledged and the session is active
    Started { session: Uuid },
    /// Session completed and its artifact was published
    Stopped { session: Uuid },
    /// Session moved to Failed
    Failed { session: Uuid, message: String },
}

#[derive(Default)]
struct Slot {
    session: Option<Session>,
    handle: Option<PipelineHandle>,
}

/// Manages the single recording session slot.
///
/// Slot transitions are serialized through the internal mutex, held only for
/// the transition itself; pipeline and publisher calls are awaited outside
/// the lock. Duplicate requests are rejected against the observable
/// Starting/Stopping states, never queued.
pub struct RecordingCoordinator {
    slot: Mutex<Slot>,

    /// Capture-and-encode capability
    pipeline: Arc<dyn CapturePipeline>,

    /// Durable storage for finished recordings
    publisher: Arc<dyn ArtifactPublisher>,

    /// Deadline applied to each pipeline begin/end call
    op_deadline: Duration,

    /// Event broadcaster
    event_tx: broadcast::Sender<RecordingEvent>,
}

impl RecordingCoordinator {
    pub fn new(
        pipeline: Arc<dyn CapturePipeline>,
        publisher: Arc<dyn ArtifactPublisher>,
        op_deadline: Duration,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            slot: Mutex::new(Slot::default()),
            pipeline,
            publisher,
            op_deadline,
            event_tx,
        }
    }

    /// Current state of the session slot.
    pub fn state(&self) -> SessionState {
        self.slot
            .lock()
            .session
            .as_ref()
            .map(|s| s.status)
            .unwrap_or_default()
    }

    /// Snapshot of the session currently occupying the slot.
    pub fn session(&self) -> Option<Session> {
        self.slot.lock().session.clone()
    }

    /// Subscribe to recording events.
    pub fn subscribe(&self) -> broadcast::Receiver<RecordingEvent> {
        self.event_tx.subscribe()
    }

    /// Start a new recording session.
    ///
    /// Validates the config before touching the slot, claims the slot while a
    /// non-terminal session is absent, then asks the pipeline to begin. A
    /// start racing against a Starting, Active or Stopping session loses with
    /// `SessionAlreadyActive` and alters nothing.
    pub async fn start(&self, config: RecordingConfig) -> RecorderResult<Uuid> {
        config.validate()?;

        let session_id = {
            let mut slot = self.slot.lock();
            if let Some(session) = &slot.session {
                if !session.status.is_terminal() {
                    return Err(RecorderError::SessionAlreadyActive);
                }
            }
            let session = Session::new(config.clone());
            let id = session.id;
            slot.session = Some(session);
            slot.handle = None;
            id
        };

        tracing::info!(
            session = %session_id,
            region = ?config.region,
            format = ?config.format,
            fps = config.fps.as_u32(),
            "starting recording session"
        );

        match tokio::time::timeout(self.op_deadline, self.pipeline.begin(&config)).await {
            Ok(Ok(handle)) => {
                {
                    let mut slot = self.slot.lock();
                    if let Some(session) = &mut slot.session {
                        session.status = SessionState::Active;
                    }
                    slot.handle = Some(handle);
                }
                let _ = self.event_tx.send(RecordingEvent::Started {
                    session: session_id,
                });
                tracing::info!(session = %session_id, "recording session active");
                Ok(session_id)
            }
            Ok(Err(err)) => {
                self.fail(session_id, err.to_string());
                Err(err.into())
            }
            Err(_) => {
                let err = RecorderError::Timeout {
                    stage: "begin",
                    deadline_secs: self.op_deadline.as_secs(),
                };
                self.fail(session_id, err.to_string());
                Err(err)
            }
        }
    }

    /// Stop the active recording session, publish its artifact and vacate the
    /// slot.
    ///
    /// Only an Active session is stoppable; a stop arriving while Starting,
    /// Stopping or with an empty slot is rejected with `NoActiveSession` and
    /// alters nothing.
    pub async fn stop(&self) -> RecorderResult<Session> {
        let (session_id, handle) = {
            let mut guard = self.slot.lock();
            let slot = &mut *guard;
            match &mut slot.session {
                Some(session) if session.status == SessionState::Active => {
                    let handle = slot
                        .handle
                        .take()
                        .ok_or(RecorderError::NoActiveSession)?;
                    session.status = SessionState::Stopping;
                    (session.id, handle)
                }
                _ => return Err(RecorderError::NoActiveSession),
            }
        };

        tracing::info!(session = %session_id, "stopping recording session");

        let raw = match tokio::time::timeout(self.op_deadline, self.pipeline.end(handle)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => {
                self.fail(session_id, err.to_string());
                return Err(err.into());
            }
            Err(_) => {
                let err = RecorderError::Timeout {
                    stage: "end",
                    deadline_secs: self.op_deadline.as_secs(),
                };
                self.fail(session_id, err.to_string());
                return Err(err);
            }
        };

        let artifact = match self.publisher.publish(raw, session_id).await {
            Ok(artifact) => artifact,
            Err(err) => {
                self.fail(session_id, err.to_string());
                return Err(err.into());
            }
        };

        // The result is handed back to the boundary, so the slot returns to
        // Idle and becomes claimable by the next start.
        let completed = {
            let mut slot = self.slot.lock();
            let mut session = slot
                .session
                .take()
                .ok_or(RecorderError::NoActiveSession)?;
            session.status = SessionState::Completed;
            session.stopped_at = Some(Utc::now());
            session.artifact = Some(artifact);
            session
        };

        let _ = self.event_tx.send(RecordingEvent::Stopped {
            session: session_id,
        });
        tracing::info!(
            session = %session_id,
            size_bytes = completed.artifact.as_ref().map(|a| a.size_bytes),
            "recording session completed"
        );
        Ok(completed)
    }

    /// Move the session to Failed, recording the error detail.
    ///
    /// The failed session stays in the slot, observable until the next start
    /// replaces it.
    fn fail(&self, session_id: Uuid, message: String) {
        {
            let mut slot = self.slot.lock();
            if let Some(session) = &mut slot.session {
                if session.id == session_id {
                    session.status = SessionState::Failed;
                    session.stopped_at = Some(Utc::now());
                    session.error = Some(message.clone());
                }
            }
            slot.handle = None;
        }
        tracing::warn!(session = %session_id, error = %message, "recording session failed");
        let _ = self.event_tx.send(RecordingEvent::Failed {
            session: session_id,
            message,
        });
    }
}
