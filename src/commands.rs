// ─── Boundary Commands ───
// One function per operation a UI or CLI can trigger. Each takes the
// explicit launcher context and returns plain data or a `LauncherError`.

use serde::Serialize;
use tracing::{info, warn};

use crate::core::downloader::{Downloader, ProgressSink};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::install::{InstallReport, VersionInstaller};
use crate::core::java::{suggested_ram_options, RamAllocation};
use crate::core::launch::{GameProcess, LaunchConfig, Launcher};
use crate::core::state::LauncherContext;
use crate::core::version::{self, RemoteVersion, VersionManifest};

/// Release versions from the remote manifest, in manifest order.
pub async fn list_remote_versions(ctx: &LauncherContext) -> LauncherResult<Vec<RemoteVersion>> {
    version::list_remote_versions(&ctx.http_client, &ctx.config.manifest_url).await
}

/// Locally installed versions. Empty when the tree cannot be read.
pub async fn list_installed_versions(ctx: &LauncherContext) -> Vec<String> {
    version::list_installed_versions(&ctx.paths).await
}

pub async fn check_version(ctx: &LauncherContext, version_id: &str) -> bool {
    version::is_installed(&ctx.paths, version_id).await
}

/// Run the download pipeline for one version.
pub async fn download_version(
    ctx: &LauncherContext,
    version_id: &str,
    descriptor_url: &str,
    progress: &dyn ProgressSink,
) -> LauncherResult<InstallReport> {
    let downloader =
        Downloader::new(ctx.http_client.clone()).with_verification(ctx.config.verify_downloads);
    VersionInstaller::new(&ctx.paths, downloader, ctx.config.resources_base())
        .install(version_id, descriptor_url, progress)
        .await
}

/// Look up a version's descriptor URL in the remote manifest.
pub async fn resolve_descriptor_url(
    ctx: &LauncherContext,
    version_id: &str,
) -> LauncherResult<String> {
    let manifest = VersionManifest::fetch(&ctx.http_client, &ctx.config.manifest_url).await?;
    manifest
        .find_version(version_id)
        .map(|entry| entry.url.clone())
        .ok_or_else(|| LauncherError::VersionNotFound(version_id.to_string()))
}

/// Launch an installed version and wait for the game to exit.
///
/// The username, heap size and version are remembered for the next run
/// once the launch has been prepared.
pub async fn launch_game(
    ctx: &LauncherContext,
    username: &str,
    version_id: &str,
    ram: &str,
) -> LauncherResult<()> {
    let config = LaunchConfig {
        username: username.to_string(),
        version_id: version_id.to_string(),
        ram: ram.to_string(),
    };
    let prepared = Launcher::new(&ctx.paths, ctx.config.missing_libraries)
        .prepare(&config)
        .await?;
    remember_choices(ctx, username, version_id, ram).await;

    info!("Starting {} as {} with {}", version_id, username, ram);
    GameProcess::spawn(&prepared.program, &prepared.args, &prepared.working_dir)?
        .wait()
        .await
}

/// Download the version if needed, then launch it.
pub async fn play(
    ctx: &LauncherContext,
    username: &str,
    version_id: &str,
    ram: &str,
    progress: &dyn ProgressSink,
) -> LauncherResult<()> {
    // Reject a bad heap size before spending time on downloads.
    ram.parse::<RamAllocation>()?;

    if !check_version(ctx, version_id).await {
        info!("Version {} not installed, downloading first", version_id);
        let url = resolve_descriptor_url(ctx, version_id).await?;
        download_version(ctx, version_id, &url, progress).await?;
    }

    launch_game(ctx, username, version_id, ram).await
}

async fn remember_choices(ctx: &LauncherContext, username: &str, version_id: &str, ram: &str) {
    let mut store = ctx.settings.lock().await;
    let saved = store.update(|settings| {
        if !username.trim().is_empty() {
            settings.username = username.trim().to_string();
        }
        settings.ram = ram.to_string();
        settings.last_version = Some(version_id.to_string());
    });
    if let Err(e) = saved {
        warn!("Could not save launcher settings: {}", e);
    }
}

#[derive(Debug, Serialize)]
pub struct SettingsPayload {
    pub username: String,
    pub ram: String,
    pub last_version: Option<String>,
    pub ram_options: Vec<String>,
}

/// Remembered choices plus heap sizes that fit this machine.
pub async fn get_settings(ctx: &LauncherContext) -> SettingsPayload {
    let store = ctx.settings.lock().await;
    let settings = store.settings();
    SettingsPayload {
        username: settings.username.clone(),
        ram: settings.ram.clone(),
        last_version: settings.last_version.clone(),
        ram_options: suggested_ram_options()
            .into_iter()
            .map(|ram| ram.jvm_value())
            .collect(),
    }
}

pub async fn get_setting(ctx: &LauncherContext, key: &str) -> Option<String> {
    ctx.settings.lock().await.get(key)
}

pub async fn set_setting(ctx: &LauncherContext, key: &str, value: &str) -> LauncherResult<()> {
    ctx.settings.lock().await.set(key, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::downloader::NoProgress;
    use crate::core::state::LauncherConfig;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> LauncherContext {
        let mut config = LauncherConfig::default().with_minecraft_dir(temp.path().join("mc"));
        // Unroutable, so any accidental network use fails fast.
        config.manifest_url = "http://127.0.0.1:9/manifest.json".into();
        LauncherContext::with_app_data_dir(config, temp.path().join("app")).unwrap()
    }

    #[tokio::test]
    async fn empty_tree_has_nothing_installed() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        assert!(list_installed_versions(&ctx).await.is_empty());
        assert!(!check_version(&ctx, "1.20.4").await);
    }

    #[tokio::test]
    async fn launch_game_requires_install() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let err = launch_game(&ctx, "Alex", "1.20.4", "2G").await.unwrap_err();
        assert!(matches!(err, LauncherError::NotInstalled(_)));
        assert_eq!(err.kind(), crate::core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn failed_launch_leaves_settings_untouched() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        set_setting(&ctx, "username", "Steve").await.unwrap();

        launch_game(&ctx, "Alex", "1.20.4", "4G").await.unwrap_err();
        launch_game(&ctx, "Alex", "1.20.4", "lots").await.unwrap_err();

        let payload = get_settings(&ctx).await;
        assert_eq!(payload.username, "Steve");
        assert_eq!(payload.ram, "2G");
        assert_eq!(payload.last_version, None);
        assert_eq!(get_setting(&ctx, "last_version").await, None);
    }

    #[tokio::test]
    async fn play_rejects_bad_ram_before_network() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let err = play(&ctx, "Alex", "1.20.4", "0G", &NoProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, LauncherError::InvalidRam(_)));
    }

    #[tokio::test]
    async fn settings_round_trip_through_context() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        set_setting(&ctx, "username", "Steve").await.unwrap();
        assert_eq!(get_setting(&ctx, "username").await.as_deref(), Some("Steve"));

        let payload = get_settings(&ctx).await;
        assert_eq!(payload.username, "Steve");
        assert_eq!(payload.ram, "2G");
    }
}
