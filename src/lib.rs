//! # Toucan build tools
//!
//! Build-support utilities used by the Toucan toolchain's build:
//!
//! - **Bundle assembly** ([`bundler`]): packages an executable as a macOS or
//!   iOS `.app` bundle with its shared libraries, a generated `Info.plist`,
//!   a provisioning profile and an optional code signature.
//! - **Replace-copy** ([`bundler::utils::fs::replace_path`]): copies a file or
//!   directory over whatever was at the destination.
//! - **Mesh literals** ([`mesh`]): converts mesh JSON into Toucan array
//!   declarations.
//!
//! ## Usage
//!
//! ```bash
//! toucan-build-tools make-app --target-name demo --target-os mac --out-dir out/Debug
//! toucan-build-tools make-app --target-name demo --target-os ios \
//!     --mobile-provision dev.mobileprovision \
//!     --team-identifier ABCDE12345 --codesign-identity "Apple Development"
//! toucan-build-tools cp gen/shaders out/Debug/shaders
//! toucan-build-tools mesh-literals --input stanford-dragon.json
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bundler;
pub mod cli;
pub mod error;
pub mod mesh;

// Re-export main types for public API
pub use bundler::{BundleSettings, BundledApp, Bundler, SettingsBuilder, TargetOs};
pub use cli::Args;
pub use error::{CliError, Result, ToolError};
