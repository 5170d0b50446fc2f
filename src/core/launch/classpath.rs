// ─── Classpath Builder ───
// Compatible libraries in descriptor order, then the client jar.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::{classpath_separator, OsName};
use crate::core::state::{MinecraftPaths, MissingLibraryPolicy};
use crate::core::version::VersionDescriptor;

/// Ordered classpath entries for `version_id`.
///
/// Libraries missing from disk are skipped with a warning under
/// [`MissingLibraryPolicy::Skip`] and abort the build under
/// [`MissingLibraryPolicy::Fail`]. The client jar is always last.
pub fn classpath_entries(
    paths: &MinecraftPaths,
    version_id: &str,
    descriptor: &VersionDescriptor,
    os: OsName,
    policy: MissingLibraryPolicy,
) -> LauncherResult<Vec<String>> {
    let mut entries = Vec::new();

    for (lib, artifact) in descriptor.compatible_libraries(os) {
        let lib_path = paths.library_path(&artifact.path)?;
        if lib_path.is_file() {
            entries.push(safe_path_str(&lib_path));
            continue;
        }

        match policy {
            MissingLibraryPolicy::Skip => {
                warn!("Library not found: {:?} ({})", lib_path, lib.display_name());
            }
            MissingLibraryPolicy::Fail => {
                return Err(LauncherError::MissingLibrary(lib_path));
            }
        }
    }

    entries.push(safe_path_str(&paths.version_jar(version_id)));
    debug!("Classpath has {} entries", entries.len());
    Ok(entries)
}

/// Classpath string joined with the platform separator (`;` on Windows, `:` elsewhere).
pub fn build_classpath(
    paths: &MinecraftPaths,
    version_id: &str,
    descriptor: &VersionDescriptor,
    os: OsName,
    policy: MissingLibraryPolicy,
) -> LauncherResult<String> {
    Ok(classpath_entries(paths, version_id, descriptor, os, policy)?.join(classpath_separator()))
}

/// Absolute, JVM-friendly rendering of `path`.
pub fn safe_path_str(path: &Path) -> String {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| absolute(path));
    let text = resolved.to_string_lossy().to_string();

    #[cfg(target_os = "windows")]
    {
        // Java fails to open classpath entries in extended-length form (`\\?\C:\...`).
        if let Some(stripped) = text.strip_prefix(r"\\?\") {
            return stripped.to_string();
        }
    }

    text
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
