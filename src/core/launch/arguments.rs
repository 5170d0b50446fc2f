// ─── Launch Arguments ───
// JVM flags, classpath, main class, then the game arguments.

use crate::core::auth::OfflineProfile;
use crate::core::java::RamAllocation;
use crate::core::state::MinecraftPaths;
use crate::core::version::VersionDescriptor;

use super::classpath::safe_path_str;

/// G1 tuning applied to every launch. Not user-configurable.
pub const GC_FLAGS: [&str; 6] = [
    "-XX:+UnlockExperimentalVMOptions",
    "-XX:+UseG1GC",
    "-XX:G1NewSizePercent=20",
    "-XX:G1ReservePercent=20",
    "-XX:MaxGCPauseMillis=50",
    "-XX:G1HeapRegionSize=32M",
];

/// Inputs that vary per launch.
pub struct ArgumentInputs<'a> {
    pub paths: &'a MinecraftPaths,
    pub version_id: &'a str,
    pub descriptor: &'a VersionDescriptor,
    pub ram: RamAllocation,
    pub classpath: &'a str,
    pub profile: &'a OfflineProfile,
}

/// Full argument vector for the runtime, in fixed order.
pub fn build_arguments(inputs: &ArgumentInputs<'_>) -> Vec<String> {
    let paths = inputs.paths;
    let natives = safe_path_str(&paths.natives_dir(inputs.version_id));
    let game_dir = safe_path_str(paths.root());
    let assets_dir = safe_path_str(&paths.assets_dir());
    let profile = inputs.profile;

    let mut args = Vec::with_capacity(32);

    // ── JVM Arguments ──
    args.push(format!("-Xmx{}", inputs.ram.jvm_value()));
    args.extend(GC_FLAGS.iter().map(|flag| flag.to_string()));
    args.push(format!("-Djava.library.path={}", natives));
    args.push("-cp".into());
    args.push(inputs.classpath.to_string());

    // Main class
    args.push(inputs.descriptor.main_class.clone());

    // ── Game Arguments ──
    let game_args: [(&str, &str); 10] = [
        ("--username", profile.username.as_str()),
        ("--version", inputs.version_id),
        ("--gameDir", game_dir.as_str()),
        ("--assetsDir", assets_dir.as_str()),
        ("--assetIndex", inputs.descriptor.asset_index_id()),
        ("--uuid", profile.session_uuid.as_str()),
        ("--accessToken", profile.access_token.as_str()),
        ("--userProperties", profile.user_properties.as_str()),
        ("--userType", profile.user_type.as_str()),
        ("--versionType", "release"),
    ];
    for (flag, value) in game_args {
        args.push(flag.to_string());
        args.push(value.to_string());
    }

    args
}
