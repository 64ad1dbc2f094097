//! Clipcast - screen recording sessions with shareable links.
//!
//! This is the main library crate for the Clipcast service. It owns the
//! lifecycle of the single recording session, drives the capture pipeline,
//! and publishes finished recordings behind share URLs.

pub mod capture;
pub mod config;
pub mod publish;
pub mod recorder;
pub mod server;
pub mod utils;

use anyhow::Context;
use capture::SyntheticCapture;
use config::ServiceConfig;
use publish::FsPublisher;
use recorder::RecordingCoordinator;
use std::sync::Arc;
use std::time::Duration;

/// Wire up the default pipeline and publisher and serve the HTTP boundary
/// until the process is stopped.
pub async fn run(config: ServiceConfig) -> anyhow::Result<()> {
    let pipeline = Arc::new(SyntheticCapture::new());
    let publisher = Arc::new(FsPublisher::new(
        config.artifacts.root_dir.clone(),
        config.artifacts.public_base_url.as_str(),
        config.artifacts.max_artifact_bytes,
    )?);
    let coordinator = Arc::new(RecordingCoordinator::new(
        pipeline,
        publisher,
        Duration::from_secs(config.pipeline.op_deadline_secs),
    ));

    let app = server::router(coordinator, &config.artifacts.root_dir);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")
}
