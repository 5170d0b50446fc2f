// ─── Logging ───
// JSON lines to a size-rotated file, plus an optional console layer.
// Only the binary calls `init`; the library just emits `tracing` events.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::core::error::{LauncherError, LauncherResult};

pub const LOG_FILE_NAME: &str = "launcher.log";
pub const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;
pub const MAX_LOG_FILES: usize = 5;
pub const DEFAULT_FILTER: &str = "info,mc_launcher=debug";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    /// Also print human-readable lines to stderr.
    pub console: bool,
}

impl LoggingConfig {
    pub fn for_app_data_dir(app_data_dir: &Path, console: bool) -> Self {
        Self {
            log_dir: app_data_dir.join("logs"),
            console,
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(config: &LoggingConfig) -> LauncherResult<()> {
    let file_writer = RotatingFileWriter::open(
        config.log_dir.join(LOG_FILE_NAME),
        MAX_LOG_BYTES,
        MAX_LOG_FILES,
    )?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(false)
        .with_writer(file_writer);

    let console_layer = config.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .compact()
            .with_writer(io::stderr)
    });

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    Ok(())
}

struct RotatingState {
    path: PathBuf,
    file: Option<File>,
    written: u64,
    max_bytes: u64,
    max_files: usize,
}

impl RotatingState {
    fn open_active(&mut self) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        self.written = file.metadata()?.len();
        self.file = Some(file);
        Ok(())
    }

    /// `launcher.log` becomes `.1`, `.1` becomes `.2`, and so on; the oldest
    /// file past `max_files` is dropped.
    fn rotate(&mut self) -> io::Result<()> {
        self.file = None;

        if self.max_files > 1 {
            let oldest = rotated_path(&self.path, self.max_files - 1);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for index in (1..self.max_files - 1).rev() {
                let from = rotated_path(&self.path, index);
                if from.exists() {
                    fs::rename(&from, rotated_path(&self.path, index + 1))?;
                }
            }
            fs::rename(&self.path, rotated_path(&self.path, 1))?;
        } else {
            fs::remove_file(&self.path)?;
        }

        self.open_active()
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        if self.file.is_none() {
            self.open_active()?;
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file not open"))?;
        file.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(buf.len())
    }
}

/// Append-only log file that rolls over once it would grow past `max_bytes`.
#[derive(Clone)]
pub struct RotatingFileWriter {
    state: Arc<Mutex<RotatingState>>,
}

impl RotatingFileWriter {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, max_files: usize) -> LauncherResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
        }

        let mut state = RotatingState {
            path: path.clone(),
            file: None,
            written: 0,
            max_bytes,
            max_files: max_files.max(1),
        };
        state.open_active().map_err(|e| LauncherError::io(&path, e))?;

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
        })
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?;
        state.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?;
        match state.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn rotated_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}
