pub mod arguments;
pub mod classpath;
pub mod task;

use std::path::PathBuf;

use tracing::info;

use crate::core::auth::OfflineProfile;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::java::{resolve_runtime_executable, RamAllocation};
use crate::core::platform::OsName;
use crate::core::state::{MinecraftPaths, MissingLibraryPolicy};
use crate::core::version::{is_installed, VersionDescriptor};

pub use arguments::{build_arguments, ArgumentInputs, GC_FLAGS};
pub use classpath::{build_classpath, classpath_entries, safe_path_str};
pub use task::{GameProcess, LaunchState};

/// Per-launch request. Not persisted.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub username: String,
    pub version_id: String,
    pub ram: String,
}

/// Everything needed to start the runtime, resolved ahead of the spawn.
#[derive(Debug, Clone)]
pub struct PreparedLaunch {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

/// Assembles and starts the game for installed versions.
pub struct Launcher<'a> {
    paths: &'a MinecraftPaths,
    policy: MissingLibraryPolicy,
    os: OsName,
    runtime: Option<PathBuf>,
}

impl<'a> Launcher<'a> {
    pub fn new(paths: &'a MinecraftPaths, policy: MissingLibraryPolicy) -> Self {
        Self {
            paths,
            policy,
            os: OsName::current(),
            runtime: None,
        }
    }

    /// Use `program` instead of resolving the runtime from `JAVA_HOME`/`PATH`.
    pub fn with_runtime(mut self, program: impl Into<PathBuf>) -> Self {
        self.runtime = Some(program.into());
        self
    }

    pub fn for_os(mut self, os: OsName) -> Self {
        self.os = os;
        self
    }

    /// Resolve the runtime and build the argument vector.
    ///
    /// Fails with [`LauncherError::NotInstalled`] before touching anything
    /// else when the version's jar or json is missing.
    pub async fn prepare(&self, config: &LaunchConfig) -> LauncherResult<PreparedLaunch> {
        let version_id = config.version_id.as_str();
        if !is_installed(self.paths, version_id).await {
            return Err(LauncherError::NotInstalled(version_id.to_string()));
        }

        let ram: RamAllocation = config.ram.parse()?;
        ram.warn_if_exceeds_system();

        let program = match &self.runtime {
            Some(program) => program.clone(),
            None => resolve_runtime_executable(),
        };

        let descriptor = VersionDescriptor::load(&self.paths.version_json(version_id)).await?;
        let classpath = build_classpath(self.paths, version_id, &descriptor, self.os, self.policy)?;
        let profile = OfflineProfile::new(&config.username);

        let args = build_arguments(&ArgumentInputs {
            paths: self.paths,
            version_id,
            descriptor: &descriptor,
            ram,
            classpath: &classpath,
            profile: &profile,
        });

        Ok(PreparedLaunch {
            program,
            args,
            working_dir: self.paths.root().to_path_buf(),
        })
    }

    /// Start the game and return without waiting for it.
    pub async fn spawn(&self, config: &LaunchConfig) -> LauncherResult<GameProcess> {
        let prepared = self.prepare(config).await?;
        info!(
            "Starting {} as {} with {}",
            config.version_id, config.username, config.ram
        );
        GameProcess::spawn(&prepared.program, &prepared.args, &prepared.working_dir)
    }

    /// Start the game and wait for it to exit. Only exit code 0 is success.
    pub async fn launch(&self, config: &LaunchConfig) -> LauncherResult<()> {
        self.spawn(config).await?.wait().await
    }
}
