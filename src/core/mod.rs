// ─── Launcher Core ───
// Backend for a vanilla Minecraft launcher: resolve, download, launch.
//
// Architecture:
//   core/
//     version/     Mojang manifest, version JSON, OS rules, installed check
//     downloader/  Streaming downloads with .part commit and SHA-1 check
//     assets/      Asset index + content-addressed objects
//     install/     Ordered download phases with progress events
//     launch/      Classpath, JVM/game arguments, process spawner
//     java/        Runtime resolution + heap sizing
//     auth/        Offline profile
//     state/       Config, paths, settings store, launcher context
//     logging      Rotating JSON log sink

pub mod assets;
pub mod auth;
pub mod downloader;
pub mod error;
pub mod http;
pub mod install;
pub mod java;
pub mod launch;
pub mod logging;
pub mod platform;
pub mod state;
pub mod version;
