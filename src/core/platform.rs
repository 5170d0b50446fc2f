// ─── Platform ───
// OS naming as used by Mojang rules, plus per-OS directory conventions.

use std::fmt;
use std::path::PathBuf;

const APP_DIR_NAME: &str = "mc-launcher";

/// Mojang OS identifiers found in library `rules[].os.name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsName {
    Windows,
    Osx,
    Linux,
}

impl OsName {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            OsName::Windows
        } else if cfg!(target_os = "macos") {
            OsName::Osx
        } else {
            OsName::Linux
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OsName::Windows => "windows",
            OsName::Osx => "osx",
            OsName::Linux => "linux",
        }
    }
}

impl fmt::Display for OsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform-specific Java classpath separator.
pub fn classpath_separator() -> &'static str {
    if cfg!(target_os = "windows") {
        ";"
    } else {
        ":"
    }
}

/// Name of the runtime executable inside `<home>/bin`.
pub fn java_executable_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "java.exe"
    } else {
        "java"
    }
}

/// Default game root following the vanilla launcher convention:
/// - Windows: `%APPDATA%\.minecraft`
/// - macOS:   `~/Library/Application Support/minecraft`
/// - other:   `~/.minecraft`
pub fn default_minecraft_dir() -> PathBuf {
    let home = || dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

    match OsName::current() {
        OsName::Windows => dirs::config_dir()
            .unwrap_or_else(home)
            .join(".minecraft"),
        OsName::Osx => dirs::data_dir()
            .unwrap_or_else(|| home().join("Library").join("Application Support"))
            .join("minecraft"),
        OsName::Linux => home().join(".minecraft"),
    }
}

/// Launcher-owned directory for settings and logs.
pub fn default_app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
