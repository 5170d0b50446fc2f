// ─── Version Manifest ───
// Fetches the Mojang version manifest and resolves stable releases.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::core::error::LauncherResult;
use crate::core::http::fetch_text;

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub url: String,
    #[serde(rename = "releaseTime", default)]
    pub release_time: Option<String>,
}

/// A version the user can pick: its id and the URL of its descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteVersion {
    pub id: String,
    pub url: String,
}

impl VersionManifest {
    /// Fetch the manifest. Network and parse failures are returned, never retried.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> LauncherResult<Self> {
        info!("Fetching Minecraft version manifest...");

        let raw = fetch_text(client, url).await.map_err(|e| {
            error!("Failed to fetch version list: {}", e);
            e
        })?;
        let manifest: VersionManifest = serde_json::from_str(&raw)?;

        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Stable releases in manifest order.
    pub fn releases(&self) -> Vec<RemoteVersion> {
        self.versions
            .iter()
            .filter(|v| v.version_type == "release")
            .map(|v| RemoteVersion {
                id: v.id.clone(),
                url: v.url.clone(),
            })
            .collect()
    }
}

/// Fetch the manifest at `url` and return its releases as (id, url) pairs.
pub async fn list_remote_versions(
    client: &reqwest::Client,
    url: &str,
) -> LauncherResult<Vec<RemoteVersion>> {
    Ok(VersionManifest::fetch(client, url).await?.releases())
}
