pub mod installed;
pub mod manifest;
pub mod version_file;

pub use installed::{is_installed, list_installed_versions};
pub use manifest::{list_remote_versions, RemoteVersion, VersionEntry, VersionManifest};
pub use version_file::{
    AssetIndexInfo, DownloadArtifact, LibDownloadArtifact, LibraryDownloads, LibraryEntry,
    LibraryRule, OsRule, RuleAction, VersionDescriptor, VersionDownloads,
};
