use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::platform::default_minecraft_dir;

pub const DEFAULT_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";
pub const DEFAULT_RESOURCES_URL: &str = "https://resources.download.minecraft.net";

/// Environment variable overriding the game root.
pub const MINECRAFT_DIR_ENV: &str = "MC_LAUNCHER_DIR";

/// What to do when a compatible library is missing while building the classpath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingLibraryPolicy {
    /// Log a warning and leave the library off the classpath.
    #[default]
    Skip,
    /// Abort the launch.
    Fail,
}

/// Static configuration of a launcher process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    pub minecraft_dir: PathBuf,
    pub manifest_url: String,
    pub resources_url: String,
    /// Check SHA-1 of freshly downloaded files when the descriptor provides one.
    pub verify_downloads: bool,
    pub missing_libraries: MissingLibraryPolicy,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            minecraft_dir: default_minecraft_dir(),
            manifest_url: DEFAULT_MANIFEST_URL.into(),
            resources_url: DEFAULT_RESOURCES_URL.into(),
            verify_downloads: true,
            missing_libraries: MissingLibraryPolicy::Skip,
        }
    }
}

impl LauncherConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(MINECRAFT_DIR_ENV).filter(|v| !v.is_empty()) {
            config.minecraft_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn with_minecraft_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.minecraft_dir = dir.into();
        self
    }

    /// Base URL for asset objects without a trailing slash.
    pub fn resources_base(&self) -> &str {
        self.resources_url.trim_end_matches('/')
    }
}
