//! mc-launcher - command-line front end for the launcher core.
//!
//! Results go to stdout, progress and logs to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use mc_launcher::commands;
use mc_launcher::core::downloader::{DownloadProgress, ProgressSink};
use mc_launcher::core::install::PhaseKind;
use mc_launcher::core::logging::{self, LoggingConfig};
use mc_launcher::core::platform::default_app_data_dir;
use mc_launcher::core::state::{LauncherConfig, LauncherContext, MissingLibraryPolicy};
use mc_launcher::{LauncherError, LauncherResult};

#[derive(Parser, Debug)]
#[command(name = "mc-launcher")]
#[command(about = "Download and launch vanilla Minecraft versions")]
struct Args {
    /// Also print logs to the console
    #[arg(long, global = true)]
    dev: bool,

    /// Game directory (defaults to $MC_LAUNCHER_DIR or the platform location)
    #[arg(long, global = true)]
    minecraft_dir: Option<PathBuf>,

    /// Version manifest URL
    #[arg(long, global = true)]
    manifest_url: Option<String>,

    /// Skip SHA-1 checks on downloaded files
    #[arg(long, global = true)]
    no_verify: bool,

    /// Refuse to launch when a library is missing instead of skipping it
    #[arg(long, global = true)]
    strict_libraries: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List release versions from the remote manifest
    Versions,
    /// List installed versions
    Installed,
    /// Check whether a version is installed
    Check { version: String },
    /// Download a version
    Download {
        version: String,
        /// Descriptor URL (looked up in the manifest when omitted)
        #[arg(long)]
        url: Option<String>,
    },
    /// Launch an installed version
    Launch(PlayArgs),
    /// Download the version if needed, then launch it
    Play(PlayArgs),
    /// Show remembered settings and suggested heap sizes
    Settings,
}

#[derive(clap::Args, Debug)]
struct PlayArgs {
    /// Player name (defaults to the remembered one)
    #[arg(short, long)]
    username: Option<String>,

    /// Version id (defaults to the last launched one)
    #[arg(short, long)]
    version: Option<String>,

    /// Heap size such as 2G or 1536M (defaults to the remembered one)
    #[arg(short, long)]
    ram: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let app_data_dir = default_app_data_dir();
    if let Err(e) = logging::init(&LoggingConfig::for_app_data_dir(&app_data_dir, args.dev)) {
        eprintln!("warning: file logging disabled: {}", e);
    }

    match run(args, app_data_dir).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, app_data_dir: PathBuf) -> LauncherResult<()> {
    let mut config = LauncherConfig::from_env();
    if let Some(dir) = args.minecraft_dir {
        config.minecraft_dir = dir;
    }
    if let Some(url) = args.manifest_url {
        config.manifest_url = url;
    }
    config.verify_downloads = !args.no_verify;
    if args.strict_libraries {
        config.missing_libraries = MissingLibraryPolicy::Fail;
    }

    let ctx = LauncherContext::with_app_data_dir(config, app_data_dir)?;
    info!("Game directory: {}", ctx.paths.root().display());

    match args.command {
        Command::Versions => {
            for version in commands::list_remote_versions(&ctx).await? {
                println!("{}\t{}", version.id, version.url);
            }
        }
        Command::Installed => {
            for id in commands::list_installed_versions(&ctx).await {
                println!("{}", id);
            }
        }
        Command::Check { version } => {
            let installed = commands::check_version(&ctx, &version).await;
            println!("{}", if installed { "installed" } else { "not installed" });
        }
        Command::Download { version, url } => {
            let url = match url {
                Some(url) => url,
                None => commands::resolve_descriptor_url(&ctx, &version).await?,
            };
            let progress = ProgressPrinter::default();
            let report = commands::download_version(&ctx, &version, &url, &progress).await?;
            println!(
                "{}: {} files downloaded, {} libraries and {} assets already present",
                version,
                report.files_downloaded(),
                report.libraries_skipped,
                report.assets_skipped
            );
        }
        Command::Launch(play) => {
            let (username, version, ram) = resolve_play_args(&ctx, play).await?;
            commands::launch_game(&ctx, &username, &version, &ram).await?;
        }
        Command::Play(play) => {
            let (username, version, ram) = resolve_play_args(&ctx, play).await?;
            let progress = ProgressPrinter::default();
            commands::play(&ctx, &username, &version, &ram, &progress).await?;
        }
        Command::Settings => {
            let settings = commands::get_settings(&ctx).await;
            println!("username\t{}", settings.username);
            println!("ram\t{}", settings.ram);
            println!(
                "last_version\t{}",
                settings.last_version.as_deref().unwrap_or("-")
            );
            println!("ram_options\t{}", settings.ram_options.join(" "));
        }
    }

    Ok(())
}

/// Fill unset launch arguments from the settings store.
async fn resolve_play_args(
    ctx: &LauncherContext,
    play: PlayArgs,
) -> LauncherResult<(String, String, String)> {
    let settings = commands::get_settings(ctx).await;
    let version = play
        .version
        .or(settings.last_version)
        .ok_or(LauncherError::NoVersionSelected)?;
    Ok((
        play.username.unwrap_or(settings.username),
        version,
        play.ram.unwrap_or(settings.ram),
    ))
}

/// Renders progress events as one stderr line per whole percent.
#[derive(Default)]
struct ProgressPrinter {
    last: Mutex<Option<(PhaseKind, u64)>>,
}

impl ProgressSink for ProgressPrinter {
    fn report(&self, progress: DownloadProgress) {
        let Ok(mut last) = self.last.lock() else {
            return;
        };

        let step = match progress.fraction() {
            Some(fraction) => (fraction * 100.0) as u64,
            // Indeterminate: one line per MiB.
            None => progress.current / (1024 * 1024),
        };
        if *last == Some((progress.phase, step)) {
            return;
        }
        *last = Some((progress.phase, step));

        match progress.total {
            Some(total) => eprintln!(
                "[{}] {}/{} ({}%)",
                progress.phase, progress.current, total, step
            ),
            None => eprintln!("[{}] {} bytes", progress.phase, progress.current),
        }
    }
}
