//! Queue configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::QueueError;

/// What happens to tasks still pending when the queue deactivates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownMode {
    /// The worker stops after the in-flight task; pending tasks are discarded
    /// and counted in [`QueueStatus::dropped`](crate::QueueStatus).
    #[default]
    Drop,

    /// The worker runs every already-accepted task before exiting. New
    /// enqueues are still rejected once shutdown has started, so the drain
    /// workload is bounded.
    Drain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub shutdown_mode: ShutdownMode,

    /// Isolate each task with a panic boundary (caught and logged). When
    /// disabled, a panicking task takes the worker thread down with it and no
    /// later task runs until the queue is re-activated.
    pub catch_panics: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            shutdown_mode: ShutdownMode::Drop,
            catch_panics: true,
        }
    }
}

impl QueueConfig {
    /// Load configuration from a JSON file. Missing fields fall back to
    /// defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, QueueError> {
        let raw = fs::read_to_string(path.as_ref())
            .map_err(|e| QueueError::Config(format!("{}: {e}", path.as_ref().display())))?;
        serde_json::from_str(&raw).map_err(|e| QueueError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_drop_pending_and_catch_panics() {
        let config = QueueConfig::default();
        assert_eq!(config.shutdown_mode, ShutdownMode::Drop);
        assert!(config.catch_panics);
    }

    #[test]
    fn parses_snake_case_modes_and_fills_defaults() {
        let config: QueueConfig =
            serde_json::from_str(r#"{ "shutdown_mode": "drain" }"#).unwrap();
        assert_eq!(config.shutdown_mode, ShutdownMode::Drain);
        assert!(config.catch_panics);

        let config: QueueConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.shutdown_mode, ShutdownMode::Drop);
    }

    #[test]
    fn loads_from_json_file() {
        let path = std::env::temp_dir().join(format!("soloq-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "shutdown_mode": "drain", "catch_panics": false }"#).unwrap();

        let config = QueueConfig::from_json_file(&path).unwrap();
        assert_eq!(config.shutdown_mode, ShutdownMode::Drain);
        assert!(!config.catch_panics);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = QueueConfig::from_json_file("/nonexistent/soloq.json").unwrap_err();
        assert!(matches!(err, QueueError::Config(_)));
    }
}
