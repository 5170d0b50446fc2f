// ─── Version File ───
// Parses a Mojang version descriptor and evaluates OS rules for libraries.

use std::path::Path;

use serde::Deserialize;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::fetch_text;
use crate::core::platform::OsName;

/// The subset of a Mojang version JSON the launcher consumes.
/// The raw document is what gets persisted, never a re-serialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    pub main_class: String,
    /// Asset index identifier (e.g. "12").
    #[serde(default)]
    pub assets: Option<String>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexInfo>,
}

#[derive(Debug, Deserialize)]
pub struct VersionDownloads {
    #[serde(default)]
    pub client: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexInfo {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
}

// ─── Library Entry with Rules ───

#[derive(Debug, Default, Deserialize)]
pub struct LibraryEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default)]
    pub rules: Option<Vec<LibraryRule>>,
}

#[derive(Debug, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<LibDownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibDownloadArtifact {
    pub path: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

// ─── OS Rule Evaluation ───

#[derive(Debug, Deserialize)]
pub struct LibraryRule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsRule>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Deserialize)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
}

impl LibraryEntry {
    /// Evaluate whether this library applies to `os`.
    ///
    /// - No rules: allowed.
    /// - Otherwise start from "disallowed" and walk the rules in order; every
    ///   rule without an `os` block, or whose `os.name` is `os`, overwrites
    ///   the outcome. An `os` block without a name matches nothing.
    pub fn is_compatible_with(&self, os: OsName) -> bool {
        let rules = match &self.rules {
            Some(r) => r,
            None => return true,
        };

        let mut allowed = false;

        for rule in rules {
            let os_matches = match &rule.os {
                None => true,
                Some(os_rule) => match &os_rule.name {
                    None => false,
                    Some(name) => name == os.as_str(),
                },
            };

            if os_matches {
                allowed = rule.action == RuleAction::Allow;
            }
        }

        allowed
    }

    pub fn is_allowed_for_current_os(&self) -> bool {
        self.is_compatible_with(OsName::current())
    }

    pub fn artifact(&self) -> Option<&LibDownloadArtifact> {
        self.downloads.as_ref()?.artifact.as_ref()
    }

    pub fn display_name(&self) -> &str {
        match (&self.name, self.artifact()) {
            (Some(name), _) => name,
            (None, Some(artifact)) => &artifact.path,
            (None, None) => "<unnamed>",
        }
    }
}

impl VersionDescriptor {
    /// Fetch and parse a descriptor, returning the raw body alongside.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> LauncherResult<(Self, String)> {
        let raw = fetch_text(client, url).await?;
        let descriptor = Self::parse(&raw)?;
        Ok((descriptor, raw))
    }

    pub fn parse(raw: &str) -> LauncherResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read a descriptor previously saved as `<id>.json`.
    pub async fn load(path: &Path) -> LauncherResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        Self::parse(&raw)
    }

    pub fn client_download(&self) -> LauncherResult<&DownloadArtifact> {
        self.downloads
            .as_ref()
            .and_then(|d| d.client.as_ref())
            .ok_or(LauncherError::IncompleteDescriptor("downloads.client"))
    }

    pub fn asset_index_info(&self) -> LauncherResult<&AssetIndexInfo> {
        self.asset_index
            .as_ref()
            .ok_or(LauncherError::IncompleteDescriptor("assetIndex"))
    }

    /// Asset index id passed as `--assetIndex`; `assets` wins over `assetIndex.id`.
    pub fn asset_index_id(&self) -> &str {
        self.assets
            .as_deref()
            .or(self.asset_index.as_ref().map(|ai| ai.id.as_str()))
            .unwrap_or("legacy")
    }

    /// Libraries that apply to `os` and have a downloadable artifact, in
    /// descriptor order.
    pub fn compatible_libraries(
        &self,
        os: OsName,
    ) -> impl Iterator<Item = (&LibraryEntry, &LibDownloadArtifact)> {
        self.libraries.iter().filter_map(move |lib| {
            if !lib.is_compatible_with(os) {
                return None;
            }
            lib.artifact().map(|artifact| (lib, artifact))
        })
    }
}
