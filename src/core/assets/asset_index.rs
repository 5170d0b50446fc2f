use indexmap::IndexMap;
use serde::Deserialize;
use tracing::info;

use crate::core::downloader::{write_file_atomic, Downloader};
use crate::core::error::LauncherResult;
use crate::core::http::fetch_text;
use crate::core::install::PhaseKind;
use crate::core::state::paths::{hash_prefix, MinecraftPaths};

/// Manages Minecraft asset downloads (sounds, textures referenced by the asset index).
pub struct AssetManager<'a> {
    paths: &'a MinecraftPaths,
    downloader: &'a Downloader,
    resources_base: &'a str,
}

/// Top-level asset index JSON structure. Objects keep document order.
#[derive(Debug, Deserialize)]
pub struct AssetIndex {
    pub objects: IndexMap<String, AssetObject>,
}

#[derive(Debug, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    pub size: u64,
}

/// Outcome of an object sync.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AssetSync {
    pub downloaded: usize,
    pub skipped: usize,
}

impl<'a> AssetManager<'a> {
    pub fn new(paths: &'a MinecraftPaths, downloader: &'a Downloader, resources_base: &'a str) -> Self {
        Self {
            paths,
            downloader,
            resources_base,
        }
    }

    /// Download the asset index JSON and persist it as `assets/indexes/<id>.json`.
    pub async fn fetch_index(&self, index_id: &str, index_url: &str) -> LauncherResult<AssetIndex> {
        let raw = fetch_text(self.downloader.client(), index_url).await?;
        let index: AssetIndex = serde_json::from_str(&raw)?;

        let index_path = self.paths.asset_index_path(index_id)?;
        write_file_atomic(&index_path, raw.as_bytes()).await?;

        Ok(index)
    }

    /// Source URL for an object: `<resources>/<hash[0:2]>/<hash>`.
    pub fn object_url(&self, hash: &str) -> String {
        format!("{}/{}/{}", self.resources_base, hash_prefix(hash), hash)
    }

    /// Fetch every object of `index` not yet on disk, one at a time.
    ///
    /// `on_item(processed, total)` fires once per object, skipped or not.
    pub async fn sync_objects<F>(&self, index: &AssetIndex, mut on_item: F) -> LauncherResult<AssetSync>
    where
        F: FnMut(u64, u64),
    {
        let total = index.objects.len() as u64;
        let mut sync = AssetSync::default();

        for (processed, obj) in index.objects.values().enumerate() {
            let url = self.object_url(&obj.hash);
            let dest = self
                .paths
                .asset_object_path(&obj.hash)
                .map_err(|e| e.in_phase(PhaseKind::Assets, &url))?;

            let fetched = self
                .downloader
                .ensure_file(&url, &dest, Some(&obj.hash))
                .await
                .map_err(|e| e.in_phase(PhaseKind::Assets, &url))?;

            if fetched {
                sync.downloaded += 1;
            } else {
                sync.skipped += 1;
            }
            on_item(processed as u64 + 1, total);
        }

        info!(
            "Asset objects: {} downloaded, {} already cached",
            sync.downloaded, sync.skipped
        );
        Ok(sync)
    }
}
