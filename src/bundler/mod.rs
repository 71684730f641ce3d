//! Application bundle assembler for macOS and iOS targets.
//!
//! Given an executable name, a target OS and an output directory, the
//! bundler produces `<name>.app` containing the executable, the shared
//! libraries it needs, a generated `Info.plist`, and for iOS a provisioning
//! profile and an optional code signature.
//!
//! # Integration
//!
//! ```no_run
//! use toucan_build_tools::bundler::{Bundler, PackagingMode, SettingsBuilder, TargetOs};
//!
//! # async fn example() -> toucan_build_tools::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .executable_name("demo")
//!     .target_os(TargetOs::Mac)
//!     .out_dir("out/Debug")
//!     .packaging_mode(PackagingMode::Symlink)
//!     .build()?;
//!
//! let app = Bundler::new(settings).assemble().await?;
//! assert!(app.info_plist_path.ends_with("Contents/Info.plist"));
//! # Ok(())
//! # }
//! ```
//!
//! # Code Signing
//!
//! iOS bundles are signed when both a signing identity and a team
//! identifier are configured; see [`platform::apple::sign`].

#![warn(missing_docs)]

mod builder;
mod error;
pub mod platform;
mod settings;
pub mod utils;

// Public re-exports
pub use builder::Bundler;
pub use error::{Context, Error, ErrorExt, Result};
pub use platform::BundleLayout;
pub use settings::{
    BundleSettings, DEFAULT_IDENTIFIER_PREFIX, EMBEDDED_PROFILE_NAME, IosSettings,
    MAC_SHARED_LIBRARIES, PackagingMode, SettingsBuilder, SigningSettings, TargetOs,
};

use std::path::PathBuf;

/// Result of a successful assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledApp {
    /// Bundle root, `<out_dir>/<name>.app`.
    pub app_dir: PathBuf,

    /// Location of the copied executable inside the bundle.
    pub executable_path: PathBuf,

    /// Location of the generated `Info.plist`.
    pub info_plist_path: PathBuf,

    /// Embedded provisioning profile (iOS only).
    pub embedded_profile: Option<PathBuf>,

    /// Whether the signing tool ran successfully on the bundle.
    pub signed: bool,
}
