//! Application bundle (.app) assembly.

use crate::bundler::{
    BundledApp,
    error::{Context, Error, ErrorExt, Result},
    platform::BundleLayout,
    settings::{BundleSettings, EMBEDDED_PROFILE_NAME, PackagingMode},
    utils::fs,
};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Assembles the bundle described by `settings`.
///
/// Steps run strictly in order and the first failure aborts the run; a
/// partially populated bundle is left in place and replaced on the next run.
pub async fn bundle_project(settings: &BundleSettings) -> Result<BundledApp> {
    let layout = BundleLayout::for_settings(settings);

    log::info!(
        "Bundling {} for {} at {}",
        settings.executable_name(),
        settings.target_os(),
        layout.app_dir().display()
    );

    // Remove old bundle, whatever its type
    fs::remove_path(layout.app_dir())
        .await
        .context("failed to remove old app bundle")?;

    fs::create_dir_all(layout.executable_dir()).await?;

    place_shared_libraries(settings, layout.executable_dir()).await?;

    let executable_path = layout.executable_dir().join(settings.executable_name());
    fs::copy_file(&settings.executable_source(), &executable_path)
        .await
        .with_context(|| {
            format!("failed to copy {} to the bundle", settings.executable_name())
        })?;

    let info_plist_path = layout.info_plist();
    super::info_plist::write(settings, &info_plist_path).await?;

    let mut embedded_profile = None;
    let mut signed = false;
    if let Some(ios) = settings.ios() {
        let profile = embed_provisioning_profile(&ios.mobile_provision, layout.app_dir()).await?;
        embedded_profile = Some(profile);

        if let Some(signing) = &ios.signing {
            super::sign::sign_bundle(
                layout.executable_dir(),
                &settings.bundle_identifier(),
                signing,
            )
            .await?;
            signed = true;
        }
    }

    Ok(BundledApp {
        app_dir: layout.app_dir().to_path_buf(),
        executable_path,
        info_plist_path,
        embedded_profile,
        signed,
    })
}

/// Copies or links each shared library from the output directory.
async fn place_shared_libraries(settings: &BundleSettings, executable_dir: &Path) -> Result<()> {
    for name in settings.shared_libraries() {
        let src = settings.out_dir().join(name);
        if !src.is_file() {
            return Err(Error::MissingLibrary {
                name: name.clone(),
                path: src,
            });
        }
        let dst = executable_dir.join(name);

        match settings.packaging_mode() {
            PackagingMode::Copy => fs::copy_file(&src, &dst).await?,
            PackagingMode::Symlink => {
                let target = src
                    .absolutize()
                    .fs_context("failed to resolve library path", &src)?;
                fs::link_file(&target, &dst).await?;
            }
        }
        log::debug!("Placed {} ({})", name, settings.packaging_mode());
    }
    Ok(())
}

/// Copies the provisioning profile to the bundle root under its fixed name.
async fn embed_provisioning_profile(profile: &Path, app_dir: &Path) -> Result<PathBuf> {
    let profile = profile
        .absolutize()
        .fs_context("failed to resolve provisioning profile path", profile)?;
    let dst = app_dir.join(EMBEDDED_PROFILE_NAME);
    fs::copy_file(&profile, &dst)
        .await
        .context("failed to embed provisioning profile")?;
    Ok(dst)
}
