// ─── Version Installer ───
// Runs the download phases for one version, strictly in order. The first
// failing phase aborts the run; files committed by earlier phases stay on
// disk and are skipped on the next attempt.

use tracing::{error, info};

use crate::core::downloader::{Downloader, ProgressSink};
use crate::core::error::LauncherResult;
use crate::core::platform::OsName;
use crate::core::state::{check_single_name, MinecraftPaths};

use super::phase::{InstallJob, InstallReport, Phase, PhaseKind};

pub struct VersionInstaller<'a> {
    paths: &'a MinecraftPaths,
    downloader: Downloader,
    resources_base: &'a str,
    os: OsName,
}

impl<'a> VersionInstaller<'a> {
    pub fn new(paths: &'a MinecraftPaths, downloader: Downloader, resources_base: &'a str) -> Self {
        Self {
            paths,
            downloader,
            resources_base,
            os: OsName::current(),
        }
    }

    /// Target a different OS for library rule evaluation.
    pub fn for_os(mut self, os: OsName) -> Self {
        self.os = os;
        self
    }

    /// Download `version_id` from its descriptor URL into the game tree.
    pub async fn install(
        &self,
        version_id: &str,
        descriptor_url: &str,
        progress: &dyn ProgressSink,
    ) -> LauncherResult<InstallReport> {
        info!("Starting download for version {}", version_id);
        // The id names a folder under versions/.
        check_single_name(version_id).map_err(|e| e.in_phase(PhaseKind::Descriptor, descriptor_url))?;

        let mut job = InstallJob {
            version_id,
            descriptor_url,
            paths: self.paths,
            downloader: &self.downloader,
            resources_base: self.resources_base,
            os: self.os,
            progress,
            descriptor: None,
            report: InstallReport::default(),
        };

        for phase in Phase::ordered() {
            if let Err(e) = phase.run(&mut job).await {
                error!(
                    "Failed to download version {} during {} phase: {}",
                    version_id,
                    phase.kind(),
                    e
                );
                return Err(e);
            }
        }

        info!(
            "Version {} downloaded successfully ({} files fetched)",
            version_id,
            job.report.files_downloaded()
        );
        Ok(job.report)
    }
}
