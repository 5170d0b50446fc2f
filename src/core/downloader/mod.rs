pub mod client;
pub mod progress;

pub use client::{part_path_for, sha1_hex, write_file_atomic, Downloader};
pub use progress::{DownloadProgress, NoProgress, ProgressSink};
