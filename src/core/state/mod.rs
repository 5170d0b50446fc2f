pub mod config;
pub mod context;
pub mod paths;
pub mod settings;

pub use config::{LauncherConfig, MissingLibraryPolicy};
pub use context::LauncherContext;
pub use paths::{check_single_name, MinecraftPaths};
pub use settings::{LauncherSettings, SettingsStore};
