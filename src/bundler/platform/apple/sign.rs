//! iOS code signing.
//!
//! Writes an entitlements property list to a scoped temporary file and runs
//! the signing tool against the bundle's executable directory. The
//! temporary file is removed on every exit path, including a failed
//! signing run.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::SigningSettings,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::process::Command;

/// Builds the entitlements dictionary for `bundle_identifier`.
pub fn entitlements(bundle_identifier: &str, team_identifier: &str) -> plist::Dictionary {
    let mut dict = plist::Dictionary::new();
    dict.insert(
        "application-identifier".into(),
        format!("{team_identifier}.{bundle_identifier}").into(),
    );
    dict.insert(
        "com.apple.developer.team-identifier".into(),
        team_identifier.into(),
    );
    dict
}

/// Writes the entitlements to a new temporary file, deleted when dropped.
fn write_entitlements(bundle_identifier: &str, team_identifier: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("entitlements-")
        .suffix(".plist")
        .tempfile()
        .fs_context("failed to create entitlements file", std::env::temp_dir())?;

    plist::Value::Dictionary(entitlements(bundle_identifier, team_identifier))
        .to_writer_xml(file.as_file_mut())?;
    file.as_file_mut()
        .flush()
        .fs_context("failed to write entitlements file", file.path())?;

    log::debug!("Wrote entitlements to {}", file.path().display());
    Ok(file)
}

/// Resolves the signing tool: explicit paths are used as given, bare names
/// are looked up on `PATH`.
fn resolve_tool(tool: &Path) -> Result<PathBuf> {
    if tool.components().count() > 1 {
        return Ok(tool.to_path_buf());
    }
    which::which(tool).map_err(|e| {
        Error::GenericError(format!(
            "code-signing tool '{}' not found on PATH: {e}",
            tool.display()
        ))
    })
}

/// Signs `target_dir` with the configured identity and generated entitlements.
///
/// Runs `<tool> -s <identity> --entitlements <file> <target_dir>` and waits
/// for it to finish. A non-zero exit status is reported as
/// [`Error::SigningFailed`].
pub async fn sign_bundle(
    target_dir: &Path,
    bundle_identifier: &str,
    signing: &SigningSettings,
) -> Result<()> {
    let tool = resolve_tool(&signing.codesign_tool)?;
    let entitlements = write_entitlements(bundle_identifier, &signing.team_identifier)?;

    log::info!(
        "Signing {} with identity '{}'",
        target_dir.display(),
        signing.identity
    );

    let output = Command::new(&tool)
        .arg("-s")
        .arg(&signing.identity)
        .arg("--entitlements")
        .arg(entitlements.path())
        .arg(target_dir)
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: tool.display().to_string(),
            error,
        })?;

    if !output.status.success() {
        return Err(Error::SigningFailed {
            target: target_dir.to_path_buf(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let entitlements_path = entitlements.path().to_path_buf();
    entitlements
        .close()
        .fs_context("failed to remove entitlements file", entitlements_path)?;

    log::info!("✓ Successfully signed {}", target_dir.display());
    Ok(())
}
