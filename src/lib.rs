pub mod commands;
pub mod core;

pub use crate::core::error::{ErrorKind, LauncherError, LauncherResult};
pub use crate::core::state::{LauncherConfig, LauncherContext};
