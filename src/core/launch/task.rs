// ─── Launch Task ───
// Spawns the game as a detached child and tracks its lifecycle.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, error, info};

use crate::core::error::{LauncherError, LauncherResult};

/// Observable lifecycle of a spawned game.
///
/// `Spawned` means the OS accepted the process; `Running` means a later poll
/// saw it still alive. Nothing here can tell whether the game window is ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchState {
    Spawned,
    Running,
    Exited(Option<i32>),
    Failed(String),
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchState::Spawned => f.write_str("spawned"),
            LaunchState::Running => f.write_str("running"),
            LaunchState::Exited(Some(code)) => write!(f, "exited({})", code),
            LaunchState::Exited(None) => f.write_str("exited(signal)"),
            LaunchState::Failed(cause) => write!(f, "failed({})", cause),
        }
    }
}

/// A game process started by the launcher.
///
/// The child is placed in its own process group (Windows: detached console),
/// so it keeps running if the launcher exits. Standard streams are inherited.
#[derive(Debug)]
pub struct GameProcess {
    child: Child,
    pid: Option<u32>,
    state: LaunchState,
}

impl GameProcess {
    pub fn spawn(program: &Path, args: &[String], working_dir: &Path) -> LauncherResult<Self> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(false);
        configure_platform_spawn(&mut cmd);

        info!("Launching Minecraft with Java: {:?}", program);
        debug!(
            "Command (copy/paste): {}",
            format_command_for_logs(program, args)
        );

        let child = cmd.spawn().map_err(|source| {
            error!("Failed to start game: {}", source);
            LauncherError::Spawn {
                program: program.to_path_buf(),
                source,
            }
        })?;
        let pid = child.id();

        Ok(Self {
            child,
            pid,
            state: LaunchState::Spawned,
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn state(&self) -> &LaunchState {
        &self.state
    }

    /// Non-blocking status check that advances the state machine.
    pub fn poll(&mut self) -> &LaunchState {
        if matches!(self.state, LaunchState::Exited(_) | LaunchState::Failed(_)) {
            return &self.state;
        }
        self.state = match self.child.try_wait() {
            Ok(None) => LaunchState::Running,
            Ok(Some(status)) => LaunchState::Exited(status.code()),
            Err(e) => LaunchState::Failed(e.to_string()),
        };
        &self.state
    }

    /// Wait for the game to exit, consuming the handle. Only exit code 0 is
    /// success.
    pub async fn wait(mut self) -> LauncherResult<()> {
        if let LaunchState::Exited(code) = self.state {
            return exit_result(code);
        }

        let pid = self.pid.unwrap_or_default();
        let status = self.child.wait().await.map_err(|source| LauncherError::Spawn {
            program: PathBuf::from(format!("pid {}", pid)),
            source,
        })?;
        exit_result(status.code())
    }
}

fn exit_result(code: Option<i32>) -> LauncherResult<()> {
    match code {
        Some(0) => {
            info!("Game exited successfully");
            Ok(())
        }
        other => {
            error!(
                "Game exited with code {}",
                other.map(|c| c.to_string()).unwrap_or_else(|| "<signal>".into())
            );
            Err(LauncherError::GameExited { code: other })
        }
    }
}

#[cfg(unix)]
fn configure_platform_spawn(cmd: &mut Command) {
    cmd.process_group(0);
}

#[cfg(windows)]
fn configure_platform_spawn(cmd: &mut Command) {
    const DETACHED_PROCESS: u32 = 0x0000_0008;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, windows)))]
fn configure_platform_spawn(_cmd: &mut Command) {}

fn format_command_for_logs(program: &Path, args: &[String]) -> String {
    let program = shell_escape(&program.to_string_lossy());
    let args = args
        .iter()
        .map(|arg| shell_escape(arg))
        .collect::<Vec<_>>()
        .join(" ");

    if args.is_empty() {
        program
    } else {
        format!("{} {}", program, args)
    }
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=' | '+')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}
