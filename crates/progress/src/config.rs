//! Progression settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Completed lessons needed before peer review opens up.
pub const DEFAULT_PEER_REVIEW_THRESHOLD: usize = 3;

/// Errors reading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Cause
        source: std::io::Error,
    },

    /// File is not valid config JSON
    #[error("invalid config {path}: {source}")]
    Json {
        /// File path
        path: String,
        /// Cause
        source: serde_json::Error,
    },
}

/// Policy knobs for the progression engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Lessons a learner must complete to unlock peer review
    pub peer_review_threshold: usize,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            peer_review_threshold: DEFAULT_PEER_REVIEW_THRESHOLD,
        }
    }
}

impl ProgressionConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io { path: display.clone(), source })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json { path: display, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(ProgressionConfig::default().peer_review_threshold, 3);
    }

    #[tokio::test]
    async fn test_from_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        tokio::fs::write(&path, "{}").await.unwrap();
        assert_eq!(ProgressionConfig::from_file(&path).await.unwrap(), ProgressionConfig::default());

        tokio::fs::write(&path, r#"{"peer_review_threshold": 5}"#).await.unwrap();
        assert_eq!(ProgressionConfig::from_file(&path).await.unwrap().peer_review_threshold, 5);
    }

    #[tokio::test]
    async fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(ProgressionConfig::from_file(&missing).await, Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.json");
        tokio::fs::write(&bad, "threshold = 3").await.unwrap();
        assert!(matches!(ProgressionConfig::from_file(&bad).await, Err(ConfigError::Json { .. })));
    }
}
