use std::path::PathBuf;
use thiserror::Error;

use crate::core::install::PhaseKind;

/// Central error type for the launcher core.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Versions ────────────────────────────────────────
    #[error("Version {0} is not installed. Download the game first.")]
    NotInstalled(String),

    #[error("Version {0} not found in the remote manifest")]
    VersionNotFound(String),

    #[error("Version descriptor has no {0}")]
    IncompleteDescriptor(&'static str),

    #[error("Refusing path outside the game directory: {0:?}")]
    InvalidPath(String),

    #[error("Library missing on disk: {0:?}")]
    MissingLibrary(PathBuf),

    // ── Pipeline ────────────────────────────────────────
    #[error("{phase} phase failed for {url}: {source}")]
    Phase {
        phase: PhaseKind,
        url: String,
        source: Box<LauncherError>,
    },

    // ── Process ─────────────────────────────────────────
    #[error("Failed to start {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Game exited with code {}", .code.map(|c| c.to_string()).unwrap_or_else(|| "<signal>".into()))]
    GameExited { code: Option<i32> },

    #[error("No version selected")]
    NoVersionSelected,

    #[error("Invalid memory allocation {0:?} (expected e.g. \"2G\" or \"512M\")")]
    InvalidRam(String),
}

/// Coarse classification used by the UI layer to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    NotFound,
    Filesystem,
    Spawn,
    Input,
}

impl LauncherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LauncherError::Http(_)
            | LauncherError::DownloadFailed { .. }
            | LauncherError::Json(_)
            | LauncherError::IncompleteDescriptor(_)
            | LauncherError::Sha1Mismatch { .. } => ErrorKind::Network,
            LauncherError::NotInstalled(_)
            | LauncherError::VersionNotFound(_)
            | LauncherError::MissingLibrary(_) => ErrorKind::NotFound,
            LauncherError::Io { .. } => ErrorKind::Filesystem,
            LauncherError::Spawn { .. } | LauncherError::GameExited { .. } => ErrorKind::Spawn,
            LauncherError::InvalidRam(_)
            | LauncherError::NoVersionSelected
            | LauncherError::InvalidPath(_) => ErrorKind::Input,
            LauncherError::Phase { source, .. } => source.kind(),
        }
    }

    /// Wrap `self` with the phase and URL it failed on.
    pub fn in_phase(self, phase: PhaseKind, url: impl Into<String>) -> Self {
        LauncherError::Phase {
            phase,
            url: url.into(),
            source: Box::new(self),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

// Dispatch layers forward errors as plain strings.
impl serde::Serialize for LauncherError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_error_keeps_inner_kind_and_context() {
        let err = LauncherError::DownloadFailed {
            url: "https://example.com/client.jar".into(),
            status: 404,
        }
        .in_phase(PhaseKind::Client, "https://example.com/client.jar");

        assert_eq!(err.kind(), ErrorKind::Network);
        let msg = err.to_string();
        assert!(msg.starts_with("game phase failed for https://example.com/client.jar"));
        assert!(msg.contains("HTTP 404"));
    }

    #[test]
    fn game_exit_message_handles_signal() {
        assert_eq!(
            LauncherError::GameExited { code: Some(3) }.to_string(),
            "Game exited with code 3"
        );
        assert_eq!(
            LauncherError::GameExited { code: None }.to_string(),
            "Game exited with code <signal>"
        );
    }

    #[test]
    fn serializes_as_display_string() {
        let err = LauncherError::NotInstalled("1.20.4".into());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(
            json,
            "\"Version 1.20.4 is not installed. Download the game first.\""
        );
    }
}
