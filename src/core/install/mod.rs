pub mod phase;
pub mod pipeline;

pub use phase::{DownloadPhase, InstallJob, InstallReport, Phase, PhaseKind};
pub use pipeline::VersionInstaller;
