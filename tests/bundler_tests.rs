use std::fs::{self, FileTimes};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use toucan_build_tools::bundler::{
    Bundler, EMBEDDED_PROFILE_NAME, Error, MAC_SHARED_LIBRARIES, PackagingMode, SettingsBuilder,
    TargetOs,
};

/// Output directory populated with an executable and the mac libraries.
fn out_dir_with_artifacts(name: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(name), b"\x7fELF fake executable").unwrap();
    for lib in MAC_SHARED_LIBRARIES {
        fs::write(dir.path().join(lib), format!("contents of {lib}")).unwrap();
    }
    dir
}

fn mac_settings(out_dir: &Path) -> SettingsBuilder {
    SettingsBuilder::new()
        .executable_name("demo")
        .target_os(TargetOs::Mac)
        .out_dir(out_dir)
}

/// Relative paths of every entry below `root`, sorted.
fn tree(root: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap().path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    entries.sort();
    entries
}

#[tokio::test]
async fn mac_bundle_has_nested_layout_and_libraries() {
    let out = out_dir_with_artifacts("demo");
    let settings = mac_settings(out.path()).build().unwrap();

    let app = Bundler::new(settings).assemble().await.unwrap();

    let macos = out.path().join("demo.app/Contents/MacOS");
    assert_eq!(app.app_dir, out.path().join("demo.app"));
    assert_eq!(app.executable_path, macos.join("demo"));
    assert_eq!(
        fs::read(macos.join("demo")).unwrap(),
        b"\x7fELF fake executable"
    );
    for lib in MAC_SHARED_LIBRARIES {
        assert_eq!(
            fs::read_to_string(macos.join(lib)).unwrap(),
            format!("contents of {lib}")
        );
    }

    let plist_path = out.path().join("demo.app/Contents/Info.plist");
    assert_eq!(app.info_plist_path, plist_path);
    let plist = fs::read_to_string(&plist_path).unwrap();
    assert!(plist.contains("<string>demo</string>"));
    assert!(plist.contains("org.toucanlang.sample.demo"));
    assert!(app.embedded_profile.is_none());
    assert!(!app.signed);
}

#[tokio::test]
async fn rebuilding_replaces_rather_than_merges() {
    let out = out_dir_with_artifacts("demo");
    let bundler = Bundler::new(mac_settings(out.path()).build().unwrap());

    bundler.assemble().await.unwrap();
    let first = tree(&out.path().join("demo.app"));

    fs::write(out.path().join("demo.app/Contents/MacOS/stale.dylib"), b"old").unwrap();
    fs::write(out.path().join("demo.app/leftover.txt"), b"old").unwrap();

    bundler.assemble().await.unwrap();
    let second = tree(&out.path().join("demo.app"));

    assert_eq!(first, second);
    assert!(!out.path().join("demo.app/leftover.txt").exists());
}

#[tokio::test]
async fn existing_file_at_bundle_root_is_replaced() {
    let out = out_dir_with_artifacts("demo");
    fs::write(out.path().join("demo.app"), b"not a directory").unwrap();

    Bundler::new(mac_settings(out.path()).build().unwrap())
        .assemble()
        .await
        .unwrap();

    assert!(out.path().join("demo.app/Contents/MacOS/demo").is_file());
}

#[tokio::test]
async fn missing_library_aborts_before_executable_is_copied() {
    let out = out_dir_with_artifacts("demo");
    fs::remove_file(out.path().join("libdawn_proc.dylib")).unwrap();

    let err = Bundler::new(mac_settings(out.path()).build().unwrap())
        .assemble()
        .await
        .unwrap_err();

    match err {
        Error::MissingLibrary { name, .. } => assert_eq!(name, "libdawn_proc.dylib"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out.path().join("demo.app/Contents/MacOS/demo").exists());
    assert!(!out.path().join("demo.app/Contents/Info.plist").exists());
}

#[tokio::test]
async fn missing_executable_is_reported() {
    let out = out_dir_with_artifacts("other");

    let err = Bundler::new(mac_settings(out.path()).build().unwrap())
        .assemble()
        .await
        .unwrap_err();

    assert!(err.is_not_found(), "{err}");
    assert!(err.to_string().contains("failed to copy demo"));
}

#[cfg(unix)]
#[tokio::test]
async fn symlink_mode_links_libraries_to_sources() {
    let out = out_dir_with_artifacts("demo");
    let settings = mac_settings(out.path())
        .packaging_mode(PackagingMode::Symlink)
        .build()
        .unwrap();

    Bundler::new(settings).assemble().await.unwrap();

    let macos = out.path().join("demo.app/Contents/MacOS");
    for lib in MAC_SHARED_LIBRARIES {
        let link = macos.join(lib);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), out.path().join(lib));
    }
    // The executable itself is always copied
    assert!(
        !fs::symlink_metadata(macos.join("demo"))
            .unwrap()
            .file_type()
            .is_symlink()
    );
}

#[cfg(unix)]
#[tokio::test]
async fn executable_permissions_are_preserved() {
    use std::os::unix::fs::PermissionsExt;

    let out = out_dir_with_artifacts("demo");
    fs::set_permissions(out.path().join("demo"), fs::Permissions::from_mode(0o755)).unwrap();

    let app = Bundler::new(mac_settings(out.path()).build().unwrap())
        .assemble()
        .await
        .unwrap();

    let mode = fs::metadata(&app.executable_path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[tokio::test]
async fn copied_artifacts_keep_source_timestamps() {
    let out = out_dir_with_artifacts("demo");
    let last_month = SystemTime::now() - Duration::from_secs(30 * 24 * 60 * 60);
    for name in ["demo", MAC_SHARED_LIBRARIES[0]] {
        fs::File::options()
            .write(true)
            .open(out.path().join(name))
            .unwrap()
            .set_times(FileTimes::new().set_accessed(last_month).set_modified(last_month))
            .unwrap();
    }

    let app = Bundler::new(mac_settings(out.path()).build().unwrap())
        .assemble()
        .await
        .unwrap();

    let modified = |path: &Path| fs::metadata(path).unwrap().modified().unwrap();
    assert_eq!(modified(&app.executable_path), modified(&out.path().join("demo")));
    let lib = MAC_SHARED_LIBRARIES[0];
    assert_eq!(
        modified(&app.app_dir.join("Contents/MacOS").join(lib)),
        modified(&out.path().join(lib))
    );
}

#[tokio::test]
async fn other_targets_get_a_flat_bundle() {
    let out = tempfile::tempdir().unwrap();
    fs::write(out.path().join("demo"), b"bin").unwrap();

    let settings = SettingsBuilder::new()
        .executable_name("demo")
        .target_os(TargetOs::Other("linux".into()))
        .out_dir(out.path())
        .build()
        .unwrap();
    let app = Bundler::new(settings).assemble().await.unwrap();

    assert_eq!(app.executable_path, out.path().join("demo.app/demo"));
    assert_eq!(app.info_plist_path, out.path().join("demo.app/Info.plist"));
    assert_eq!(
        tree(&app.app_dir),
        vec![PathBuf::from("Info.plist"), PathBuf::from("demo")]
    );
}

#[tokio::test]
async fn ios_bundle_embeds_provisioning_profile() {
    let out = tempfile::tempdir().unwrap();
    fs::write(out.path().join("demo"), b"bin").unwrap();
    let profile = out.path().join("dev.mobileprovision");
    fs::write(&profile, b"profile bytes").unwrap();

    let settings = SettingsBuilder::new()
        .executable_name("demo")
        .target_os(TargetOs::Ios)
        .out_dir(out.path())
        .mobile_provision(&profile)
        .build()
        .unwrap();
    let app = Bundler::new(settings).assemble().await.unwrap();

    let embedded = out.path().join("demo.app").join(EMBEDDED_PROFILE_NAME);
    assert_eq!(app.embedded_profile.as_deref(), Some(embedded.as_path()));
    assert_eq!(fs::read(&embedded).unwrap(), b"profile bytes");
    assert_eq!(app.executable_path, out.path().join("demo.app/Contents/demo"));
    assert!(out.path().join("demo.app/Contents/Info.plist").is_file());
    // ios ships no dylibs and has no MacOS directory
    assert!(!out.path().join("demo.app/Contents/MacOS").exists());
    assert!(!app.signed);
}

#[tokio::test]
async fn ios_without_profile_fails_before_touching_the_bundle() {
    let out = tempfile::tempdir().unwrap();
    let marker = out.path().join("demo.app/marker");
    fs::create_dir_all(marker.parent().unwrap()).unwrap();
    fs::write(&marker, b"untouched").unwrap();

    let err = SettingsBuilder::new()
        .executable_name("demo")
        .target_os(TargetOs::Ios)
        .out_dir(out.path())
        .build()
        .unwrap_err();

    assert!(matches!(err, Error::InvalidSettings(_)));
    assert_eq!(fs::read(&marker).unwrap(), b"untouched");
}

#[cfg(unix)]
mod signing {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Writes a stand-in signing tool that records its arguments and the
    /// entitlements it was given, then exits with `exit_code`.
    fn fake_codesign(dir: &Path, exit_code: i32) -> PathBuf {
        let tool = dir.join("fake-codesign");
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{args}'\ncp \"$4\" '{ent}'\necho 'no identity found' >&2\nexit {exit_code}\n",
            args = dir.join("args.log").display(),
            ent = dir.join("entitlements.copy").display(),
        );
        fs::write(&tool, script).unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        tool
    }

    fn recorded_args(dir: &Path) -> Vec<String> {
        fs::read_to_string(dir.join("args.log"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn signed_ios_settings(out: &Path, tool: &Path) -> SettingsBuilder {
        fs::write(out.join("demo"), b"bin").unwrap();
        fs::write(out.join("dev.mobileprovision"), b"profile").unwrap();
        SettingsBuilder::new()
            .executable_name("demo")
            .target_os(TargetOs::Ios)
            .out_dir(out)
            .mobile_provision(out.join("dev.mobileprovision"))
            .codesign_identity("Apple Development: Demo")
            .team_identifier("ABCDE12345")
            .codesign_tool(tool)
    }

    #[tokio::test]
    async fn signs_executable_dir_and_removes_entitlements() {
        let out = tempfile::tempdir().unwrap();
        let tools = tempfile::tempdir().unwrap();
        let tool = fake_codesign(tools.path(), 0);

        let settings = signed_ios_settings(out.path(), &tool).build().unwrap();
        let app = Bundler::new(settings).assemble().await.unwrap();
        assert!(app.signed);

        let args = recorded_args(tools.path());
        assert_eq!(args.len(), 5);
        assert_eq!(args[0], "-s");
        assert_eq!(args[1], "Apple Development: Demo");
        assert_eq!(args[2], "--entitlements");
        assert_eq!(PathBuf::from(&args[4]), out.path().join("demo.app/Contents"));
        assert!(!Path::new(&args[3]).exists(), "entitlements file left behind");

        let entitlements = fs::read_to_string(tools.path().join("entitlements.copy")).unwrap();
        assert!(entitlements.contains("<key>application-identifier</key>"));
        assert!(entitlements.contains("<string>ABCDE12345.org.toucanlang.sample.demo</string>"));
        assert!(entitlements.contains("<key>com.apple.developer.team-identifier</key>"));
    }

    #[tokio::test]
    async fn failed_signing_still_removes_entitlements() {
        let out = tempfile::tempdir().unwrap();
        let tools = tempfile::tempdir().unwrap();
        let tool = fake_codesign(tools.path(), 3);

        let settings = signed_ios_settings(out.path(), &tool).build().unwrap();
        let err = Bundler::new(settings).assemble().await.unwrap_err();

        match &err {
            Error::SigningFailed { status, stderr, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "no identity found");
            }
            other => panic!("unexpected error: {other}"),
        }
        let args = recorded_args(tools.path());
        assert!(!Path::new(&args[3]).exists(), "entitlements file left behind");
        // Already-populated parts of the bundle stay in place
        assert!(out.path().join("demo.app").join(EMBEDDED_PROFILE_NAME).exists());
    }

    #[tokio::test]
    async fn unlaunchable_tool_is_a_command_failure() {
        let out = tempfile::tempdir().unwrap();
        let tool = out.path().join("missing/codesign");

        let settings = signed_ios_settings(out.path(), &tool).build().unwrap();
        let err = Bundler::new(settings).assemble().await.unwrap_err();

        assert!(matches!(err, Error::CommandFailed { .. }), "{err}");
    }
}
