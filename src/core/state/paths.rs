use std::path::{Component, Path, PathBuf};

use crate::core::error::{LauncherError, LauncherResult};

/// The on-disk game tree. This layout is shared with the vanilla launcher
/// and must not change:
///
/// ```text
/// <root>/
///   versions/<id>/<id>.json
///   versions/<id>/<id>.jar
///   libraries/<artifact path>
///   assets/indexes/<asset index id>.json
///   assets/objects/<hash[0:2]>/<hash>
///   natives/<id>/
/// ```
#[derive(Debug, Clone)]
pub struct MinecraftPaths {
    root: PathBuf,
}

impl MinecraftPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.root.join("libraries")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn natives_root(&self) -> PathBuf {
        self.root.join("natives")
    }

    pub fn version_dir(&self, version_id: &str) -> PathBuf {
        self.versions_dir().join(version_id)
    }

    pub fn version_json(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id)
            .join(format!("{}.json", version_id))
    }

    pub fn version_jar(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id)
            .join(format!("{}.jar", version_id))
    }

    /// Referenced by `-Djava.library.path`; this crate never populates it.
    pub fn natives_dir(&self, version_id: &str) -> PathBuf {
        self.natives_root().join(version_id)
    }

    /// `libraries/<artifact_path>`. The path comes from a remote descriptor and
    /// must stay inside the libraries folder.
    pub fn library_path(&self, artifact_path: &str) -> LauncherResult<PathBuf> {
        Ok(self.libraries_dir().join(relative_within_tree(artifact_path)?))
    }

    pub fn asset_index_path(&self, index_id: &str) -> LauncherResult<PathBuf> {
        check_single_name(index_id)?;
        Ok(self
            .assets_dir()
            .join("indexes")
            .join(format!("{}.json", index_id)))
    }

    /// Content-addressed location of an asset object. Only the hash matters,
    /// so objects are shared across versions.
    pub fn asset_object_path(&self, hash: &str) -> LauncherResult<PathBuf> {
        if hash.len() < 2 || !hash.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(LauncherError::InvalidPath(hash.to_string()));
        }
        Ok(self
            .assets_dir()
            .join("objects")
            .join(hash_prefix(hash))
            .join(hash))
    }

    /// Create the top-level directories of the tree.
    pub fn ensure_layout(&self) -> LauncherResult<()> {
        for dir in [
            self.root.clone(),
            self.versions_dir(),
            self.assets_dir(),
            self.libraries_dir(),
            self.natives_root(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|source| LauncherError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Version ids and asset index ids must name exactly one path component.
pub fn check_single_name(name: &str) -> LauncherResult<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(only)), None) if only == name => Ok(()),
        _ => Err(LauncherError::InvalidPath(name.to_string())),
    }
}

/// Validate a relative path taken from remote metadata: only plain
/// components, no root, drive prefix or `..`.
fn relative_within_tree(raw: &str) -> LauncherResult<&Path> {
    let path = Path::new(raw);
    let plain = !raw.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if plain {
        Ok(path)
    } else {
        Err(LauncherError::InvalidPath(raw.to_string()))
    }
}

/// First two characters of an asset hash, used as the shard directory.
pub fn hash_prefix(hash: &str) -> &str {
    hash.get(..2).unwrap_or(hash)
}
