//! Service configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP boundary listens on.
    pub listen_addr: SocketAddr,

    /// Artifact storage and share-URL settings.
    pub artifacts: ArtifactConfig,

    /// Capture pipeline settings.
    pub pipeline: PipelineConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Artifact storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory where published recordings are stored.
    pub root_dir: PathBuf,

    /// Public base URL share links are minted against.
    pub public_base_url: String,

    /// Largest artifact the publisher will accept, in bytes.
    pub max_artifact_bytes: u64,
}

/// Capture pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Deadline for each pipeline begin/end call, in seconds.
    pub op_deadline_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "clipcast=debug,warn").
    pub level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: ([127, 0, 0, 1], 8787).into(),
            artifacts: ArtifactConfig::default(),
            pipeline: PipelineConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("artifacts"),
            public_base_url: "http://127.0.0.1:8787/artifacts".to_string(),
            max_artifact_bytes: 32 * 1024 * 1024,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            op_deadline_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "clipcast=info,tower_http=info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load config from `path`, falling back to defaults on a missing or
    /// unreadable file.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", path, e);
                }
            }
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ServiceConfig::load(Path::new("/nonexistent/clipcast.json"));
        assert_eq!(config.pipeline.op_deadline_secs, 30);
        assert_eq!(config.artifacts.max_artifact_bytes, 32 * 1024 * 1024);
    }

    #[test]
    fn partial_file_keeps_defaults_for_omitted_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipcast.json");
        std::fs::write(&path, r#"{"pipeline":{"op_deadline_secs":5}}"#).unwrap();

        let config = ServiceConfig::load(&path);
        assert_eq!(config.pipeline.op_deadline_secs, 5);
        assert_eq!(config.listen_addr, ([127, 0, 0, 1], 8787).into());
    }
}
