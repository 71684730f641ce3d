//! Platform-specific bundle layout and assembly.
//!
//! # Bundle Layouts
//!
//! | Target | Contents directory | Executable directory |
//! |--------|--------------------|----------------------|
//! | `mac` | `<name>.app/Contents/` | `<name>.app/Contents/MacOS/` |
//! | `ios` | `<name>.app/Contents/` | `<name>.app/Contents/` |
//! | other | `<name>.app/` | `<name>.app/` |
//!
//! Assembly itself lives in [`apple`]; the flat layout for other targets
//! reuses the same pipeline with the Apple-only steps skipped.

pub mod apple;

use crate::bundler::settings::{BundleSettings, TargetOs};
use std::path::{Path, PathBuf};

/// The three directories a bundle is assembled into.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BundleLayout {
    app_dir: PathBuf,
    contents_dir: PathBuf,
    executable_dir: PathBuf,
}

impl BundleLayout {
    /// Computes the layout for `settings` without touching the filesystem.
    pub fn for_settings(settings: &BundleSettings) -> Self {
        Self::new(
            settings.out_dir(),
            settings.executable_name(),
            settings.target_os(),
        )
    }

    /// Computes the layout of `<out_dir>/<name>.app` for `target_os`.
    pub fn new(out_dir: &Path, name: &str, target_os: &TargetOs) -> Self {
        let app_dir = out_dir.join(format!("{name}.app"));
        let (contents_dir, executable_dir) = match target_os {
            TargetOs::Mac => {
                let contents = app_dir.join("Contents");
                let macos = contents.join("MacOS");
                (contents, macos)
            }
            TargetOs::Ios => {
                let contents = app_dir.join("Contents");
                (contents.clone(), contents)
            }
            TargetOs::Other(_) => (app_dir.clone(), app_dir.clone()),
        };
        Self {
            app_dir,
            contents_dir,
            executable_dir,
        }
    }

    /// Bundle root, `<out_dir>/<name>.app`.
    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// Directory receiving `Info.plist`.
    pub fn contents_dir(&self) -> &Path {
        &self.contents_dir
    }

    /// Directory receiving the executable and shared libraries.
    pub fn executable_dir(&self) -> &Path {
        &self.executable_dir
    }

    /// Path of the generated `Info.plist`.
    pub fn info_plist(&self) -> PathBuf {
        self.contents_dir.join("Info.plist")
    }
}
