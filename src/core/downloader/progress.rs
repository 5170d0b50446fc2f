use serde::Serialize;

use crate::core::install::PhaseKind;

/// One progress tick of the download pipeline.
///
/// For the client jar `current`/`total` are bytes; for libraries and assets
/// they count items. `total` is `None` when the server did not announce a
/// length, which callers should render as indeterminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DownloadProgress {
    pub phase: PhaseKind,
    pub current: u64,
    pub total: Option<u64>,
}

impl DownloadProgress {
    pub fn new(phase: PhaseKind, current: u64, total: Option<u64>) -> Self {
        Self {
            phase,
            current,
            total,
        }
    }

    /// Completion in `0.0..=1.0`, `None` when indeterminate.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(0) => Some(1.0),
            Some(total) => Some((self.current as f64 / total as f64).min(1.0)),
            None => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.total, Some(total) if self.current >= total)
    }
}

/// Receiver of progress events. Implemented for any `Fn(DownloadProgress)`.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: DownloadProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(DownloadProgress) + Send + Sync,
{
    fn report(&self, progress: DownloadProgress) {
        self(progress)
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: DownloadProgress) {}
}
