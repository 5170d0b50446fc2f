use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};

const PART_SUFFIX: &str = ".part";

/// Sequential streaming downloader.
///
/// Every file is written to `<dest>.part` and renamed into place only after the
/// stream finished (and, when known, the SHA-1 matched). A failed transfer
/// therefore never leaves a file that a later presence check would accept.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    verify_sha1: bool,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            verify_sha1: true,
        }
    }

    pub fn with_verification(mut self, verify_sha1: bool) -> Self {
        self.verify_sha1 = verify_sha1;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Download `url` to `dest` unless `dest` already exists.
    ///
    /// Returns `true` when a transfer happened.
    pub async fn ensure_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
    ) -> LauncherResult<bool> {
        if tokio::fs::try_exists(dest).await.unwrap_or(false) {
            debug!("Already present, skipping: {:?}", dest);
            return Ok(false);
        }
        self.download_file(url, dest, sha1_expected, |_, _| {}).await?;
        Ok(true)
    }

    /// Stream `url` into `dest`, calling `on_chunk(received, total)` after every
    /// chunk. `total` is the declared content length, `None` when absent.
    ///
    /// Creates parent directories as needed.
    pub async fn download_file<F>(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
        mut on_chunk: F,
    ) -> LauncherResult<u64>
    where
        F: FnMut(u64, Option<u64>),
    {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length();
        let part_path = part_path_for(dest);

        let result = self
            .stream_to_part(response, &part_path, total_bytes, &mut on_chunk)
            .await
            .and_then(|(received, digest)| {
                self.check_digest(dest, sha1_expected, digest)?;
                Ok(received)
            });

        let received = match result {
            Ok(received) => received,
            Err(e) => {
                let _ = tokio::fs::remove_file(&part_path).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&part_path, dest).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(LauncherError::io(dest, e));
        }

        debug!("Downloaded: {} -> {:?} ({} bytes)", url, dest, received);
        Ok(received)
    }

    async fn stream_to_part<F>(
        &self,
        response: reqwest::Response,
        part_path: &Path,
        total_bytes: Option<u64>,
        on_chunk: &mut F,
    ) -> LauncherResult<(u64, String)>
    where
        F: FnMut(u64, Option<u64>),
    {
        // The handle must be closed before the rename; Windows keeps it locked otherwise.
        let mut file = tokio::fs::File::create(part_path)
            .await
            .map_err(|e| LauncherError::io(part_path, e))?;

        let mut hasher = Sha1::new();
        let mut received: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            hasher.update(&chunk);
            file.write_all(&chunk)
                .await
                .map_err(|e| LauncherError::io(part_path, e))?;
            received += chunk.len() as u64;
            on_chunk(received, total_bytes);
        }

        file.flush()
            .await
            .map_err(|e| LauncherError::io(part_path, e))?;
        drop(file);

        Ok((received, hex::encode(hasher.finalize())))
    }

    fn check_digest(
        &self,
        dest: &Path,
        sha1_expected: Option<&str>,
        actual: String,
    ) -> LauncherResult<()> {
        if !self.verify_sha1 {
            return Ok(());
        }
        let Some(expected) = sha1_expected else {
            return Ok(());
        };
        if actual.eq_ignore_ascii_case(expected) {
            return Ok(());
        }
        warn!("SHA-1 mismatch for {:?}", dest);
        Err(LauncherError::Sha1Mismatch {
            path: dest.to_path_buf(),
            expected: expected.to_string(),
            actual,
        })
    }
}

/// Write `contents` to `dest` through a `.part` file and a rename.
pub async fn write_file_atomic(dest: &Path, contents: &[u8]) -> LauncherResult<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| LauncherError::io(parent, e))?;
    }

    let part_path = part_path_for(dest);
    if let Err(e) = tokio::fs::write(&part_path, contents).await {
        let _ = tokio::fs::remove_file(&part_path).await;
        return Err(LauncherError::io(&part_path, e));
    }
    if let Err(e) = tokio::fs::rename(&part_path, dest).await {
        let _ = tokio::fs::remove_file(&part_path).await;
        return Err(LauncherError::io(dest, e));
    }
    Ok(())
}

/// Temporary path a download streams into before being committed.
pub fn part_path_for(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

/// Hex SHA-1 of `bytes`.
pub fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
