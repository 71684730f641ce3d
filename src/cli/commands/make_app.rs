//! `make-app` command implementation.
//!
//! Translates the command line into [`SettingsBuilder`] calls and runs the
//! bundle assembler.

use crate::bundler::{Bundler, SettingsBuilder, TargetOs};
use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{CliError, Result};

/// Execute make-app command
pub(super) async fn execute_make_app(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let Command::MakeApp {
        target_name,
        target_os,
        out_dir,
        mobile_provision,
        team_identifier,
        codesign_identity,
        codesign_tool,
        packaging_mode,
        identifier_prefix,
    } = &args.command
    else {
        unreachable!("execute_make_app called with non-MakeApp command");
    };

    let mut builder = SettingsBuilder::new()
        .executable_name(target_name)
        .target_os(target_os.clone())
        .packaging_mode(*packaging_mode)
        .identifier_prefix(identifier_prefix)
        .codesign_tool(codesign_tool);

    if let Some(dir) = out_dir {
        builder = builder.out_dir(dir);
    }

    match (target_os, mobile_provision) {
        (TargetOs::Ios, Some(profile)) => builder = builder.mobile_provision(profile),
        (TargetOs::Ios, None) => {
            return Err(CliError::MissingArgument {
                argument: "--mobile-provision".to_string(),
            }
            .into());
        }
        (_, Some(_)) => {
            let _ = config
                .output()
                .warn("--mobile-provision is only used for ios bundles");
        }
        (_, None) => {}
    }

    if let Some(identity) = codesign_identity {
        builder = builder.codesign_identity(identity);
    }
    if let Some(team) = team_identifier {
        builder = builder.team_identifier(team);
    }

    let settings = builder.build()?;
    let bundler = Bundler::new(settings);

    let layout = bundler.layout();
    config.verbose_println(&format!(
        "Assembling {} ({} libraries, {})",
        layout.app_dir().display(),
        bundler.settings().shared_libraries().len(),
        bundler.settings().packaging_mode()
    ));

    let app = bundler.assemble().await?;

    config.success_println(&format!("Created {}", app.app_dir.display()));
    config.indent(&format!("executable: {}", app.executable_path.display()));
    config.indent(&format!("Info.plist: {}", app.info_plist_path.display()));
    if let Some(profile) = &app.embedded_profile {
        config.indent(&format!("profile:    {}", profile.display()));
    }
    if app.signed {
        config.indent("signed:     yes");
    }

    Ok(0)
}
