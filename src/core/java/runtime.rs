use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::platform::java_executable_name;

pub const JAVA_HOME_ENV: &str = "JAVA_HOME";

/// Pick the Java executable to spawn.
///
/// `<JAVA_HOME>/bin/java` when the variable is set and the file exists,
/// otherwise the bare `java` name resolved through `PATH` at spawn time.
/// Never fails; a bad choice only shows up when the process is started.
pub fn resolve_runtime_executable() -> PathBuf {
    let java_home = std::env::var_os(JAVA_HOME_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    resolve_runtime_executable_from(java_home.as_deref())
}

pub fn resolve_runtime_executable_from(java_home: Option<&Path>) -> PathBuf {
    if let Some(home) = java_home {
        let candidate = home.join("bin").join(java_executable_name());
        if is_usable_java_binary(&candidate) {
            debug!("Using Java from JAVA_HOME: {:?}", candidate);
            return candidate;
        }
        warn!("JAVA_HOME path not accessible: {:?}", candidate);
    }

    PathBuf::from(java_executable_name())
}

pub fn is_usable_java_binary(path: &Path) -> bool {
    path.is_file()
}
