use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::assets::AssetManager;
use crate::core::downloader::{write_file_atomic, DownloadProgress, Downloader, ProgressSink};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::OsName;
use crate::core::state::MinecraftPaths;
use crate::core::version::VersionDescriptor;

/// Stage of the download pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Descriptor,
    #[serde(rename = "game")]
    Client,
    Libraries,
    Assets,
}

impl PhaseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseKind::Descriptor => "descriptor",
            PhaseKind::Client => "game",
            PhaseKind::Libraries => "libraries",
            PhaseKind::Assets => "assets",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a finished install did, per phase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub client_downloaded: bool,
    pub libraries_downloaded: usize,
    pub libraries_skipped: usize,
    pub assets_downloaded: usize,
    pub assets_skipped: usize,
}

impl InstallReport {
    /// Number of binary files transferred (client, libraries, assets).
    pub fn files_downloaded(&self) -> usize {
        usize::from(self.client_downloaded) + self.libraries_downloaded + self.assets_downloaded
    }
}

/// Mutable state threaded through the phases of one install.
pub struct InstallJob<'a> {
    pub version_id: &'a str,
    pub descriptor_url: &'a str,
    pub paths: &'a MinecraftPaths,
    pub downloader: &'a Downloader,
    pub resources_base: &'a str,
    pub os: OsName,
    pub progress: &'a dyn ProgressSink,
    pub descriptor: Option<VersionDescriptor>,
    pub report: InstallReport,
}

impl InstallJob<'_> {
    fn emit(&self, phase: PhaseKind, current: u64, total: Option<u64>) {
        self.progress
            .report(DownloadProgress::new(phase, current, total));
    }

    fn descriptor(&self, phase: PhaseKind) -> LauncherResult<&VersionDescriptor> {
        self.descriptor.as_ref().ok_or_else(|| {
            LauncherError::IncompleteDescriptor("parsed descriptor").in_phase(phase, self.descriptor_url)
        })
    }
}

#[async_trait]
pub trait DownloadPhase: Send + Sync {
    fn kind(&self) -> PhaseKind;

    /// Run the phase. Errors come back already tagged with the phase and URL.
    async fn run(&self, job: &mut InstallJob<'_>) -> LauncherResult<()>;
}

// ─── descriptor ───

/// GET the descriptor, parse it, store it verbatim as `<id>.json`.
pub struct DescriptorPhase;

#[async_trait]
impl DownloadPhase for DescriptorPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Descriptor
    }

    async fn run(&self, job: &mut InstallJob<'_>) -> LauncherResult<()> {
        let url = job.descriptor_url;
        let tag = |e: LauncherError| e.in_phase(PhaseKind::Descriptor, url);

        let (descriptor, raw) = VersionDescriptor::fetch(job.downloader.client(), url)
            .await
            .map_err(tag)?;
        write_file_atomic(&job.paths.version_json(job.version_id), raw.as_bytes())
            .await
            .map_err(tag)?;

        debug!("Saved descriptor for {}", job.version_id);
        job.descriptor = Some(descriptor);
        job.emit(PhaseKind::Descriptor, 1, Some(1));
        Ok(())
    }
}

// ─── game (client jar) ───

/// Stream the client jar to `<id>.jar`, reporting bytes.
pub struct ClientPhase;

#[async_trait]
impl DownloadPhase for ClientPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Client
    }

    async fn run(&self, job: &mut InstallJob<'_>) -> LauncherResult<()> {
        let client = job.descriptor(PhaseKind::Client)?.client_download().map_err(|e| {
            e.in_phase(PhaseKind::Client, job.descriptor_url)
        })?;
        let url = client.url.clone();
        let sha1 = client.sha1.clone();
        let jar_path = job.paths.version_jar(job.version_id);

        if let Ok(meta) = tokio::fs::metadata(&jar_path).await {
            debug!("Client jar already present: {:?}", jar_path);
            job.emit(PhaseKind::Client, meta.len(), Some(meta.len()));
            return Ok(());
        }

        let progress = job.progress;
        job.downloader
            .download_file(&url, &jar_path, sha1.as_deref(), |received, total| {
                progress.report(DownloadProgress::new(PhaseKind::Client, received, total));
            })
            .await
            .map_err(|e| e.in_phase(PhaseKind::Client, &url))?;

        job.report.client_downloaded = true;
        info!("Downloaded client jar for {}", job.version_id);
        Ok(())
    }
}

// ─── libraries ───

/// Fetch every library compatible with the target OS that is not on disk.
pub struct LibrariesPhase;

#[async_trait]
impl DownloadPhase for LibrariesPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Libraries
    }

    async fn run(&self, job: &mut InstallJob<'_>) -> LauncherResult<()> {
        let descriptor = job.descriptor(PhaseKind::Libraries)?;
        let artifacts: Vec<_> = descriptor
            .compatible_libraries(job.os)
            .map(|(_, artifact)| artifact.clone())
            .collect();

        let total = artifacts.len() as u64;
        if total == 0 {
            job.emit(PhaseKind::Libraries, 0, Some(0));
        }

        for (done, artifact) in artifacts.iter().enumerate() {
            let dest = job
                .paths
                .library_path(&artifact.path)
                .map_err(|e| e.in_phase(PhaseKind::Libraries, &artifact.url))?;
            let fetched = job
                .downloader
                .ensure_file(&artifact.url, &dest, artifact.sha1.as_deref())
                .await
                .map_err(|e| e.in_phase(PhaseKind::Libraries, &artifact.url))?;

            if fetched {
                job.report.libraries_downloaded += 1;
            } else {
                job.report.libraries_skipped += 1;
            }
            job.emit(PhaseKind::Libraries, done as u64 + 1, Some(total));
        }

        info!(
            "Processed {} libraries ({} downloaded)",
            total, job.report.libraries_downloaded
        );
        Ok(())
    }
}

// ─── assets ───

/// Fetch the asset index, then every object missing from the shared store.
pub struct AssetsPhase;

#[async_trait]
impl DownloadPhase for AssetsPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Assets
    }

    async fn run(&self, job: &mut InstallJob<'_>) -> LauncherResult<()> {
        let descriptor = job.descriptor(PhaseKind::Assets)?;
        let index_info = descriptor
            .asset_index_info()
            .map_err(|e| e.in_phase(PhaseKind::Assets, job.descriptor_url))?
            .clone();
        let index_id = descriptor.asset_index_id().to_string();

        let assets = AssetManager::new(job.paths, job.downloader, job.resources_base);
        let index = assets
            .fetch_index(&index_id, &index_info.url)
            .await
            .map_err(|e| e.in_phase(PhaseKind::Assets, &index_info.url))?;

        if index.objects.is_empty() {
            job.emit(PhaseKind::Assets, 0, Some(0));
        }

        let progress = job.progress;
        let sync = assets
            .sync_objects(&index, |done, total| {
                progress.report(DownloadProgress::new(PhaseKind::Assets, done, Some(total)));
            })
            .await?;

        job.report.assets_downloaded = sync.downloaded;
        job.report.assets_skipped = sync.skipped;
        Ok(())
    }
}

/// Dispatcher without `Box<dyn>`; the order of [`Phase::ordered`] is the
/// execution order.
pub enum Phase {
    Descriptor(DescriptorPhase),
    Client(ClientPhase),
    Libraries(LibrariesPhase),
    Assets(AssetsPhase),
}

impl Phase {
    pub fn ordered() -> [Phase; 4] {
        [
            Phase::Descriptor(DescriptorPhase),
            Phase::Client(ClientPhase),
            Phase::Libraries(LibrariesPhase),
            Phase::Assets(AssetsPhase),
        ]
    }

    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Descriptor(p) => p.kind(),
            Phase::Client(p) => p.kind(),
            Phase::Libraries(p) => p.kind(),
            Phase::Assets(p) => p.kind(),
        }
    }

    pub async fn run(&self, job: &mut InstallJob<'_>) -> LauncherResult<()> {
        match self {
            Phase::Descriptor(p) => p.run(job).await,
            Phase::Client(p) => p.run(job).await,
            Phase::Libraries(p) => p.run(job).await,
            Phase::Assets(p) => p.run(job).await,
        }
    }
}
