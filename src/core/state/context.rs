use std::path::{Path, PathBuf};

use reqwest::Client;
use tokio::sync::Mutex;

use crate::core::error::LauncherResult;
use crate::core::http::build_http_client;
use crate::core::platform::default_app_data_dir;

use super::config::LauncherConfig;
use super::paths::MinecraftPaths;
use super::settings::SettingsStore;

/// Everything an operation needs, built once at process start and passed
/// explicitly to each component.
pub struct LauncherContext {
    pub config: LauncherConfig,
    pub paths: MinecraftPaths,
    pub http_client: Client,
    pub settings: Mutex<SettingsStore>,
    app_data_dir: PathBuf,
}

impl LauncherContext {
    /// Build the context and make sure the game tree exists.
    pub fn new(config: LauncherConfig) -> LauncherResult<Self> {
        Self::with_app_data_dir(config, default_app_data_dir())
    }

    pub fn with_app_data_dir(
        config: LauncherConfig,
        app_data_dir: impl Into<PathBuf>,
    ) -> LauncherResult<Self> {
        let app_data_dir = app_data_dir.into();
        let paths = MinecraftPaths::new(&config.minecraft_dir);
        paths.ensure_layout()?;

        let http_client = build_http_client()?;
        let settings = SettingsStore::open(&app_data_dir);

        Ok(Self {
            config,
            paths,
            http_client,
            settings: Mutex::new(settings),
            app_data_dir,
        })
    }

    pub fn app_data_dir(&self) -> &Path {
        &self.app_data_dir
    }
}
