// ─── Installed Versions ───
// Presence checks on `versions/<id>/`. No checksums are involved: a version
// counts as installed when both its jar and its descriptor exist.

use tracing::{debug, error};

use crate::core::state::{check_single_name, MinecraftPaths};

/// True iff `versions/<id>/<id>.jar` and `versions/<id>/<id>.json` both exist.
pub async fn is_installed(paths: &MinecraftPaths, version_id: &str) -> bool {
    if check_single_name(version_id).is_err() {
        return false;
    }
    let jar = paths.version_jar(version_id);
    let json = paths.version_json(version_id);

    let jar_ok = tokio::fs::try_exists(&jar).await.unwrap_or(false);
    let json_ok = tokio::fs::try_exists(&json).await.unwrap_or(false);
    jar_ok && json_ok
}

/// Installed version ids, sorted by name. Read errors degrade to an empty list.
pub async fn list_installed_versions(paths: &MinecraftPaths) -> Vec<String> {
    let versions_dir = paths.versions_dir();
    let mut read_dir = match tokio::fs::read_dir(&versions_dir).await {
        Ok(read_dir) => read_dir,
        Err(e) => {
            error!("Failed to get installed versions from {:?}: {}", versions_dir, e);
            return Vec::new();
        }
    };

    let mut installed = Vec::new();
    loop {
        let entry = match read_dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read {:?}: {}", versions_dir, e);
                break;
            }
        };

        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }

        let id = entry.file_name().to_string_lossy().to_string();
        if is_installed(paths, &id).await {
            installed.push(id);
        } else {
            debug!("Skipping incomplete version folder {}", id);
        }
    }

    installed.sort();
    installed
}
