//! End-to-end tests of version resolution and the download pipeline against
//! a local HTTP server standing in for the manifest, version and resource
//! hosts.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use serde_json::json;
use tempfile::TempDir;

use mc_launcher::commands;
use mc_launcher::core::downloader::{sha1_hex, DownloadProgress};
use mc_launcher::core::install::PhaseKind;
use mc_launcher::core::state::{LauncherConfig, LauncherContext};
use mc_launcher::{ErrorKind, LauncherError};

const VERSION: &str = "1.20.4";
const CLIENT_JAR: &[u8] = b"PK\x03\x04 client jar bytes for the fake game";
const LIB_COMMON: &[u8] = b"PK common library";
const LIB_RULED: &[u8] = b"PK ruled library";
const LIB_NEVER: &[u8] = b"PK library for an unknown platform";
const ASSET_SOUND: &[u8] = b"OggS cave sound";
const ASSET_ICON: &[u8] = b"\x89PNG icon";

/// Static files served by path, with per-path hit counters.
#[derive(Default)]
struct Fixture {
    files: Mutex<HashMap<String, Vec<u8>>>,
    hits: Mutex<HashMap<String, usize>>,
    requests: Mutex<Vec<String>>,
}

impl Fixture {
    fn put(&self, path: &str, body: impl Into<Vec<u8>>) {
        self.files.lock().unwrap().insert(path.to_string(), body.into());
    }

    fn remove(&self, path: &str) {
        self.files.lock().unwrap().remove(path);
    }

    fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    /// Position of the first request for `path`.
    fn first_request(&self, path: &str) -> Option<usize> {
        self.requests.lock().unwrap().iter().position(|p| p == path)
    }

    /// Rewrite a served JSON document in place.
    fn edit_json(&self, path: &str, edit: impl FnOnce(&mut serde_json::Value)) {
        let mut files = self.files.lock().unwrap();
        let body = files.get_mut(path).unwrap();
        let mut doc: serde_json::Value = serde_json::from_slice(body).unwrap();
        edit(&mut doc);
        *body = doc.to_string().into_bytes();
    }
}

async fn serve_file(State(fixture): State<Arc<Fixture>>, uri: Uri) -> impl IntoResponse {
    let path = uri.path().to_string();
    *fixture.hits.lock().unwrap().entry(path.clone()).or_default() += 1;
    fixture.requests.lock().unwrap().push(path.clone());
    match fixture.files.lock().unwrap().get(&path) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, Vec::new()),
    }
}

async fn start_server(fixture: Arc<Fixture>) -> SocketAddr {
    let app = Router::new().fallback(serve_file).with_state(fixture);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn object_path(hash: &str) -> String {
    format!("/resources/{}/{}", &hash[..2], hash)
}

/// Serve a manifest with mixed version types and one complete version.
fn populate(fixture: &Fixture, base: &str) {
    fixture.put(
        "/manifest.json",
        json!({
            "latest": { "release": VERSION, "snapshot": "24w10a" },
            "versions": [
                { "id": "24w10a", "type": "snapshot", "url": format!("{base}/v/24w10a.json"), "releaseTime": "2024-03-06T12:00:00+00:00" },
                { "id": VERSION, "type": "release", "url": format!("{base}/v/{VERSION}.json"), "releaseTime": "2023-12-07T12:56:20+00:00" },
                { "id": "b1.7.3", "type": "old_beta", "url": format!("{base}/v/b1.7.3.json"), "releaseTime": "2011-07-08T00:00:00+00:00" },
                { "id": "1.20.3", "type": "release", "url": format!("{base}/v/1.20.3.json"), "releaseTime": "2023-12-05T12:00:00+00:00" }
            ]
        })
        .to_string(),
    );

    fixture.put(
        "/indexes/12.json",
        json!({
            "objects": {
                "minecraft/sounds/ambient/cave/cave1.ogg": { "hash": sha1_hex(ASSET_SOUND), "size": ASSET_SOUND.len() },
                "icons/icon_16x16.png": { "hash": sha1_hex(ASSET_ICON), "size": ASSET_ICON.len() }
            }
        })
        .to_string(),
    );

    fixture.put(
        &format!("/v/{VERSION}.json"),
        json!({
            "id": VERSION,
            "type": "release",
            "mainClass": "net.minecraft.client.main.Main",
            "assets": "12",
            "assetIndex": { "id": "12", "url": format!("{base}/indexes/12.json") },
            "downloads": {
                "client": {
                    "url": format!("{base}/bin/client.jar"),
                    "sha1": sha1_hex(CLIENT_JAR),
                    "size": CLIENT_JAR.len()
                }
            },
            "libraries": [
                {
                    "name": "com.example:common:1.0",
                    "downloads": { "artifact": {
                        "path": "com/example/common/1.0/common-1.0.jar",
                        "url": format!("{base}/lib/common.jar"),
                        "sha1": sha1_hex(LIB_COMMON)
                    } }
                },
                {
                    "name": "com.example:ruled:1.0",
                    "downloads": { "artifact": {
                        "path": "com/example/ruled/1.0/ruled-1.0.jar",
                        "url": format!("{base}/lib/ruled.jar")
                    } },
                    "rules": [
                        { "action": "allow" },
                        { "action": "disallow", "os": { "name": "plan9" } }
                    ]
                },
                {
                    "name": "com.example:never:1.0",
                    "downloads": { "artifact": {
                        "path": "com/example/never/1.0/never-1.0.jar",
                        "url": format!("{base}/lib/never.jar")
                    } },
                    "rules": [{ "action": "allow", "os": { "name": "plan9" } }]
                },
                { "name": "com.example:natives-only:1.0", "downloads": {} }
            ]
        })
        .to_string(),
    );

    fixture.put("/bin/client.jar", CLIENT_JAR);
    fixture.put("/lib/common.jar", LIB_COMMON);
    fixture.put("/lib/ruled.jar", LIB_RULED);
    fixture.put("/lib/never.jar", LIB_NEVER);
    fixture.put(&object_path(&sha1_hex(ASSET_SOUND)), ASSET_SOUND);
    fixture.put(&object_path(&sha1_hex(ASSET_ICON)), ASSET_ICON);
}

struct Harness {
    _temp: TempDir,
    fixture: Arc<Fixture>,
    base: String,
    ctx: LauncherContext,
}

async fn harness() -> Harness {
    let fixture = Arc::new(Fixture::default());
    let addr = start_server(fixture.clone()).await;
    let base = format!("http://{addr}");
    populate(&fixture, &base);

    let temp = TempDir::new().unwrap();
    let mut config = LauncherConfig::default().with_minecraft_dir(temp.path().join("minecraft"));
    config.manifest_url = format!("{base}/manifest.json");
    config.resources_url = format!("{base}/resources/");
    let ctx = LauncherContext::with_app_data_dir(config, temp.path().join("app")).unwrap();

    Harness {
        _temp: temp,
        fixture,
        base,
        ctx,
    }
}

type Events = Arc<Mutex<Vec<DownloadProgress>>>;

fn recorder() -> (Events, impl Fn(DownloadProgress) + Send + Sync) {
    let events: Events = Arc::default();
    let sink = {
        let events = events.clone();
        move |progress: DownloadProgress| events.lock().unwrap().push(progress)
    };
    (events, sink)
}

fn last_of(events: &[DownloadProgress], phase: PhaseKind) -> DownloadProgress {
    *events
        .iter()
        .rev()
        .find(|e| e.phase == phase)
        .unwrap_or_else(|| panic!("no {phase} events"))
}

fn find_part_files(dir: &Path, found: &mut Vec<String>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            find_part_files(&path, found);
        } else if path.to_string_lossy().ends_with(".part") {
            found.push(path.to_string_lossy().to_string());
        }
    }
}

#[tokio::test]
async fn remote_versions_are_releases_in_manifest_order() {
    let h = harness().await;
    let versions = commands::list_remote_versions(&h.ctx).await.unwrap();

    let ids: Vec<_> = versions.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec![VERSION, "1.20.3"]);
    assert_eq!(versions[0].url, format!("{}/v/{VERSION}.json", h.base));
}

#[tokio::test]
async fn unreachable_manifest_is_a_network_error() {
    let h = harness().await;
    h.fixture.remove("/manifest.json");

    let err = commands::list_remote_versions(&h.ctx).await.unwrap_err();
    assert!(matches!(err, LauncherError::DownloadFailed { status: 404, .. }));
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn full_download_lays_out_the_tree() {
    let h = harness().await;
    let (events, sink) = recorder();
    let url = commands::resolve_descriptor_url(&h.ctx, VERSION).await.unwrap();

    let report = commands::download_version(&h.ctx, VERSION, &url, &sink)
        .await
        .unwrap();

    let paths = &h.ctx.paths;
    assert!(report.client_downloaded);
    assert_eq!(report.libraries_downloaded, 2);
    assert_eq!(report.assets_downloaded, 2);

    // Descriptor is stored verbatim.
    let served = h.fixture.files.lock().unwrap()[&format!("/v/{VERSION}.json")].clone();
    assert_eq!(std::fs::read(paths.version_json(VERSION)).unwrap(), served);
    assert_eq!(std::fs::read(paths.version_jar(VERSION)).unwrap(), CLIENT_JAR);

    assert_eq!(
        std::fs::read(paths.library_path("com/example/common/1.0/common-1.0.jar").unwrap()).unwrap(),
        LIB_COMMON
    );
    assert!(paths.library_path("com/example/ruled/1.0/ruled-1.0.jar").unwrap().is_file());
    assert!(!paths.library_path("com/example/never/1.0/never-1.0.jar").unwrap().exists());
    assert_eq!(h.fixture.hits("/lib/never.jar"), 0);

    // Objects are sharded by the first two hex digits of their hash.
    let sound = sha1_hex(ASSET_SOUND);
    let sound_path = paths
        .assets_dir()
        .join("objects")
        .join(&sound[..2])
        .join(&sound);
    assert_eq!(std::fs::read(sound_path).unwrap(), ASSET_SOUND);
    assert!(paths.asset_index_path("12").unwrap().is_file());

    assert!(commands::check_version(&h.ctx, VERSION).await);
    assert_eq!(
        commands::list_installed_versions(&h.ctx).await,
        vec![VERSION.to_string()]
    );

    let events = events.lock().unwrap();
    let game = last_of(&events, PhaseKind::Client);
    assert_eq!(game.current, CLIENT_JAR.len() as u64);
    assert_eq!(game.total, Some(CLIENT_JAR.len() as u64));
    assert_eq!(last_of(&events, PhaseKind::Libraries).current, 2);
    assert_eq!(last_of(&events, PhaseKind::Libraries).total, Some(2));
    assert_eq!(last_of(&events, PhaseKind::Assets).total, Some(2));
    assert_eq!(
        events
            .iter()
            .filter(|e| e.phase == PhaseKind::Libraries)
            .count(),
        2
    );
}

#[tokio::test]
async fn second_run_skips_binaries_and_completes_progress() {
    let h = harness().await;
    let url = format!("{}/v/{VERSION}.json", h.base);
    commands::download_version(&h.ctx, VERSION, &url, &|_: DownloadProgress| {})
        .await
        .unwrap();

    let binaries = [
        "/bin/client.jar".to_string(),
        "/lib/common.jar".to_string(),
        "/lib/ruled.jar".to_string(),
        object_path(&sha1_hex(ASSET_SOUND)),
        object_path(&sha1_hex(ASSET_ICON)),
    ];
    let before: Vec<_> = binaries.iter().map(|p| h.fixture.hits(p)).collect();
    assert!(before.iter().all(|&hits| hits == 1));

    let (events, sink) = recorder();
    let report = commands::download_version(&h.ctx, VERSION, &url, &sink)
        .await
        .unwrap();

    let after: Vec<_> = binaries.iter().map(|p| h.fixture.hits(p)).collect();
    assert_eq!(before, after);
    assert_eq!(report.files_downloaded(), 0);
    assert_eq!(report.libraries_skipped, 2);
    assert_eq!(report.assets_skipped, 2);

    let events = events.lock().unwrap();
    for phase in [
        PhaseKind::Descriptor,
        PhaseKind::Client,
        PhaseKind::Libraries,
        PhaseKind::Assets,
    ] {
        assert!(last_of(&events, phase).is_complete(), "{phase} not at 100%");
    }
}

#[tokio::test]
async fn missing_library_fails_with_phase_and_url() {
    let h = harness().await;
    h.fixture.remove("/lib/ruled.jar");
    let url = format!("{}/v/{VERSION}.json", h.base);

    let err = commands::download_version(&h.ctx, VERSION, &url, &|_: DownloadProgress| {})
        .await
        .unwrap_err();

    match &err {
        LauncherError::Phase { phase, url, source } => {
            assert_eq!(*phase, PhaseKind::Libraries);
            assert_eq!(url, &format!("{}/lib/ruled.jar", h.base));
            assert!(matches!(**source, LauncherError::DownloadFailed { status: 404, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.to_string().starts_with("libraries phase failed for"));

    // Earlier phases stay committed; the version is not yet usable.
    assert!(h.ctx.paths.version_jar(VERSION).is_file());
    assert_eq!(h.fixture.hits("/indexes/12.json"), 0);

    // A later run resumes and only fetches what is missing.
    h.fixture.put("/lib/ruled.jar", LIB_RULED);
    let report = commands::download_version(&h.ctx, VERSION, &url, &|_: DownloadProgress| {})
        .await
        .unwrap();
    assert!(!report.client_downloaded);
    assert_eq!(report.libraries_downloaded, 1);
    assert_eq!(h.fixture.hits("/bin/client.jar"), 1);
}

#[tokio::test]
async fn absolute_library_path_fails_the_libraries_phase() {
    let h = harness().await;
    h.fixture.edit_json(&format!("/v/{VERSION}.json"), |doc| {
        doc["libraries"][0]["downloads"]["artifact"]["path"] = json!("/etc/x.jar");
    });
    let url = format!("{}/v/{VERSION}.json", h.base);

    let err = commands::download_version(&h.ctx, VERSION, &url, &|_: DownloadProgress| {})
        .await
        .unwrap_err();

    match &err {
        LauncherError::Phase { phase, url, source } => {
            assert_eq!(*phase, PhaseKind::Libraries);
            assert_eq!(url, &format!("{}/lib/common.jar", h.base));
            assert!(matches!(**source, LauncherError::InvalidPath(ref p) if p == "/etc/x.jar"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::Input);
    assert_eq!(h.fixture.hits("/lib/common.jar"), 0);
    assert!(!commands::check_version(&h.ctx, VERSION).await);
}

#[tokio::test]
async fn parent_components_in_library_path_are_refused() {
    let h = harness().await;
    h.fixture.edit_json(&format!("/v/{VERSION}.json"), |doc| {
        doc["libraries"][1]["downloads"]["artifact"]["path"] = json!("../../escaped.jar");
    });
    let url = format!("{}/v/{VERSION}.json", h.base);

    let err = commands::download_version(&h.ctx, VERSION, &url, &|_: DownloadProgress| {})
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LauncherError::Phase { phase: PhaseKind::Libraries, ref source, .. }
            if matches!(**source, LauncherError::InvalidPath(_))
    ));
    let temp_root = h.ctx.paths.root().parent().unwrap();
    assert!(!temp_root.join("escaped.jar").exists());
    assert!(!h.ctx.paths.root().join("escaped.jar").exists());
}

#[tokio::test]
async fn version_id_with_separators_is_refused() {
    let h = harness().await;
    let url = format!("{}/v/{VERSION}.json", h.base);

    let err = commands::download_version(&h.ctx, "../outside", &url, &|_: DownloadProgress| {})
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LauncherError::Phase { phase: PhaseKind::Descriptor, ref source, .. }
            if matches!(**source, LauncherError::InvalidPath(_))
    ));
    assert_eq!(h.fixture.hits(&format!("/v/{VERSION}.json")), 0);
}

#[tokio::test]
async fn asset_objects_are_fetched_in_index_order() {
    let h = harness().await;
    let url = format!("{}/v/{VERSION}.json", h.base);
    commands::download_version(&h.ctx, VERSION, &url, &|_: DownloadProgress| {})
        .await
        .unwrap();

    // The index lists the sound before the icon, against name order.
    let sound = h.fixture.first_request(&object_path(&sha1_hex(ASSET_SOUND))).unwrap();
    let icon = h.fixture.first_request(&object_path(&sha1_hex(ASSET_ICON))).unwrap();
    assert!(sound < icon);
}

#[tokio::test]
async fn corrupted_client_is_rejected_without_leftovers() {
    let h = harness().await;
    h.fixture.put("/bin/client.jar", b"truncated".to_vec());
    let url = format!("{}/v/{VERSION}.json", h.base);

    let err = commands::download_version(&h.ctx, VERSION, &url, &|_: DownloadProgress| {})
        .await
        .unwrap_err();

    match err {
        LauncherError::Phase { phase, source, .. } => {
            assert_eq!(phase, PhaseKind::Client);
            assert!(matches!(*source, LauncherError::Sha1Mismatch { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!h.ctx.paths.version_jar(VERSION).exists());
    assert!(!commands::check_version(&h.ctx, VERSION).await);

    let mut parts = Vec::new();
    find_part_files(h.ctx.paths.root(), &mut parts);
    assert!(parts.is_empty(), "leftover partial files: {parts:?}");
}

#[tokio::test]
async fn missing_asset_object_is_tagged_with_assets_phase() {
    let h = harness().await;
    let icon = object_path(&sha1_hex(ASSET_ICON));
    h.fixture.remove(&icon);
    let url = format!("{}/v/{VERSION}.json", h.base);

    let err = commands::download_version(&h.ctx, VERSION, &url, &|_: DownloadProgress| {})
        .await
        .unwrap_err();

    match err {
        LauncherError::Phase { phase, url, .. } => {
            assert_eq!(phase, PhaseKind::Assets);
            assert_eq!(url, format!("{}{}", h.base, icon));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unknown_version_is_not_found() {
    let h = harness().await;
    let err = commands::resolve_descriptor_url(&h.ctx, "9.99")
        .await
        .unwrap_err();
    assert!(matches!(err, LauncherError::VersionNotFound(ref id) if id == "9.99"));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn installed_version_without_runtime_reports_spawn_failure() {
    let h = harness().await;
    let url = format!("{}/v/{VERSION}.json", h.base);
    commands::download_version(&h.ctx, VERSION, &url, &|_: DownloadProgress| {})
        .await
        .unwrap();

    let launcher = mc_launcher::core::launch::Launcher::new(
        &h.ctx.paths,
        h.ctx.config.missing_libraries,
    )
    .with_runtime(h.ctx.paths.root().join("no-such-java"));
    let config = mc_launcher::core::launch::LaunchConfig {
        username: "Alex".into(),
        version_id: VERSION.into(),
        ram: "2G".into(),
    };

    let prepared = launcher.prepare(&config).await.unwrap();
    let cp_index = prepared.args.iter().position(|a| a == "-cp").unwrap();
    let classpath = &prepared.args[cp_index + 1];
    assert!(classpath.contains("common-1.0.jar"));
    assert!(classpath.contains("ruled-1.0.jar"));
    assert!(!classpath.contains("never-1.0.jar"));
    assert!(classpath.ends_with(&format!("{VERSION}.jar")));

    let err = launcher.launch(&config).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Spawn);
}
