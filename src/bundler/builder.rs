//! Bundle orchestration.
//!
//! The [`Bundler`] owns one validated [`BundleSettings`] and runs the
//! assembly pipeline for it:
//!
//! 1. Compute the bundle layout for the target OS
//! 2. Remove any previous bundle at the destination
//! 3. Create the directory tree
//! 4. Place shared libraries (`mac` only)
//! 5. Copy the executable
//! 6. Write `Info.plist`
//! 7. Embed the provisioning profile and sign (`ios` only)
//!
//! # Example
//!
//! ```no_run
//! use toucan_build_tools::bundler::{Bundler, SettingsBuilder, TargetOs};
//!
//! # async fn example() -> toucan_build_tools::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .executable_name("demo")
//!     .target_os(TargetOs::Mac)
//!     .out_dir("/build")
//!     .build()?;
//!
//! let app = Bundler::new(settings).assemble().await?;
//! println!("Created {}", app.app_dir.display());
//! # Ok(())
//! # }
//! ```

use crate::bundler::{BundleLayout, BundleSettings, BundledApp, Result, platform};

/// Assembles application bundles.
#[derive(Debug, Clone)]
pub struct Bundler {
    settings: BundleSettings,
}

impl Bundler {
    /// Creates a bundler for already-validated settings.
    pub fn new(settings: BundleSettings) -> Self {
        Self { settings }
    }

    /// The settings this bundler was created with.
    pub fn settings(&self) -> &BundleSettings {
        &self.settings
    }

    /// Where the bundle will be written, computed without side effects.
    pub fn layout(&self) -> BundleLayout {
        BundleLayout::for_settings(&self.settings)
    }

    /// Runs the assembly pipeline, replacing any existing bundle.
    pub async fn assemble(&self) -> Result<BundledApp> {
        let app = platform::apple::app::bundle_project(&self.settings).await?;

        log::info!(
            "✓ Bundled {} ({}{})",
            app.app_dir.display(),
            self.settings.target_os(),
            if app.signed { ", signed" } else { "" }
        );

        Ok(app)
    }
}
