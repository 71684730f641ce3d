//! `cp` command implementation.

use crate::bundler::utils::fs::replace_path;
use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

/// Execute cp command
pub(super) async fn execute_cp(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let Command::Cp { src, dst } = &args.command else {
        unreachable!("execute_cp called with non-Cp command");
    };

    config.verbose_println(&format!("Replacing {} with {}", dst.display(), src.display()));
    replace_path(src, dst).await?;

    Ok(0)
}
