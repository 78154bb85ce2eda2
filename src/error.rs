//! Error types for the download core
//!
//! Tool probes, job setup and orchestrator transitions each get their own
//! enum so callers can tell a recoverable risk from a fatal setup failure.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while querying or updating one of the external tools
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} error: {stderr}")]
    Failed { tool: String, stderr: String },

    #[error("Unsupported OS: {0}")]
    UnsupportedOs(String),

    #[error("Failed to fetch release info from GitHub: {0}")]
    Http(String),

    #[error("Invalid release info: {0}")]
    ReleaseInfo(String),

    #[error("Asset not found: {0}")]
    AssetMissing(String),

    #[error("Failed to download yt-dlp: {0}")]
    Download(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while preparing or launching a job
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("No valid URLs provided")]
    NoUrls,

    #[error("Could not write URL list {path}: {source}")]
    BatchFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid command line syntax - failed to parse arguments")]
    CommandLine,

    #[error("Failed to spawn yt-dlp: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Unsupported OS: {0}")]
    UnsupportedOs(String),
}

/// A request the orchestrator refused in its current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("a job can only be started from the idle state")]
    NotIdle,

    #[error("no start confirmation is pending")]
    NotConfirming,

    #[error("risks must be acknowledged before starting")]
    AcknowledgementRequired,

    #[error("a job is still running")]
    Busy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_display_includes_stderr() {
        let err = ToolError::Failed {
            tool: "ffprobe".to_string(),
            stderr: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "ffprobe error: not found");
    }

    #[test]
    fn test_setup_error_display() {
        assert_eq!(SetupError::NoUrls.to_string(), "No valid URLs provided");
        let spawn = SetupError::Spawn(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert!(spawn.to_string().starts_with("Failed to spawn yt-dlp"));
    }
}
